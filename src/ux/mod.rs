use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::MediaConfig;
use crate::errors::CoachError;
use crate::profile::UserProfile;
use crate::prompt::ResponseMode;
use crate::session::Turn;

pub fn print_banner(mode: ResponseMode) {
    println!("\n{}", "AI Mental Health Coach".bold());
    println!("Share your thoughts or experiences to receive personalized mental health advice.");
    println!(
        "Current response type: {}  {}",
        mode.label().cyan().bold(),
        "(/modes, /mode <name>, /history, /profile, /quit; start with // to send text beginning with /)".dimmed()
    );
    println!();
}

pub fn print_modes(current: Option<ResponseMode>) {
    println!("\n{}", "Response types:".bold());
    for m in ResponseMode::ALL {
        let marker = if Some(m) == current { "*" } else { " " };
        println!(" {} {:<12} {}", marker, m.name().cyan(), m.label());
    }
    println!();
}

pub fn print_mode_switched(mode: ResponseMode) {
    println!("{} {}", "Switched to".dimmed(), mode.label().cyan().bold());
}

/// Render one turn. Assistant turns carry the "Show more" explanation and,
/// in UX modes, the visual and audio aid references.
pub fn render_turn(turn: &Turn, mode: Option<ResponseMode>, media: &MediaConfig) -> String {
    match turn {
        Turn::User { text } => format!("{} {}", "you ›".blue().bold(), text),
        Turn::Assistant { text, explanation } => {
            let mut out = format!("{} {}", "coach ›".green().bold(), text);
            if let Some(e) = explanation {
                out.push_str(&format!("\n  {} {}", "Show more:".dimmed(), e.italic()));
            }
            if mode.map(|m| m.shows_media()).unwrap_or(false) {
                out.push_str(&format!("\n  {} {}", "Visual Aid:".magenta(), media.image_path));
                out.push_str(&format!("\n  {} {}", "Audio:".magenta(), media.audio_path));
            }
            out
        }
    }
}

pub fn print_transcript(turns: &[Turn], mode: Option<ResponseMode>, media: &MediaConfig) {
    if turns.is_empty() {
        println!("{}", "(no messages yet)".dimmed());
        return;
    }
    for t in turns {
        println!("{}\n", render_turn(t, mode, media));
    }
}

pub fn print_profile(p: &UserProfile) {
    println!("\n{}", "Profile".bold());
    println!("  age:                      {}", p.age);
    println!("  gender:                   {}", p.gender);
    println!("  conversation_history:     {}", p.conversation_history);
    println!("  emotional_state:          {}", p.emotional_state);
    println!("  preferred_support_style:  {}", p.preferred_support_style);
    println!("  topics_of_interest:       {}", p.topics_of_interest);
    println!("  previous_advice_feedback: {}", p.previous_advice_feedback);
    println!();
}

/// Errors are shown inline; the transcript stays as it was.
pub fn print_error(err: &CoachError) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

pub fn spinner(enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("thinking...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turn_shows_explanation() {
        let media = MediaConfig::default();
        let t = Turn::assistant("Breathe slowly.", Some("why it helps".into()));
        let out = render_turn(&t, Some(ResponseMode::Plain), &media);
        assert!(out.contains("Breathe slowly."));
        assert!(out.contains("why it helps"));
        assert!(!out.contains(&media.image_path));
    }

    #[test]
    fn ux_modes_reference_media() {
        let media = MediaConfig::default();
        let t = Turn::assistant("Picture a beach.", None);
        for mode in [ResponseMode::UxOnly, ResponseMode::DataAndUx] {
            let out = render_turn(&t, Some(mode), &media);
            assert!(out.contains("example2.jpg"));
            assert!(out.contains("example.mp3"));
        }
    }

    #[test]
    fn user_turn_has_no_media() {
        let media = MediaConfig::default();
        let out = render_turn(&Turn::user("hello"), Some(ResponseMode::UxOnly), &media);
        assert!(out.contains("hello"));
        assert!(!out.contains("example.mp3"));
    }
}

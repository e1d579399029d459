use owo_colors::OwoColorize;

use clipmark_core::Extraction;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "clipmark".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Clean text from social posts and web articles\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information, coloured by how long the network round trips took
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 1000.0 {
        eprintln!("  {} {:>8.2}ms ({})\n", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 5000.0 {
        eprintln!("  {} {:>8.2}ms ({})\n", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})\n", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print a summary of what was extracted
pub fn print_extraction_details(extraction: &Extraction) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extraction Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    match extraction {
        Extraction::Social(social) => {
            let author = format!("{} (@{})", social.post.author, social.post.author_handle);
            eprintln!("  {} {}", "Author:".dimmed(), author.bright_white());
            eprintln!("  {} {}", "Thread:".dimmed(), (social.thread.len() + 1).to_string().bright_white());
            eprintln!("  {} {}", "Quote depth:".dimmed(), social.post.quote_depth().to_string().bright_white());
            if let Some(parent) = &social.reply_parent {
                eprintln!("  {} @{}", "Replying to:".dimmed(), parent.author_handle.bright_white());
            }
        }
        Extraction::Article(article) => {
            eprintln!("  {} {}", "Title:".dimmed(), article.title.bright_white());
            if let Some(site) = &article.site_name {
                eprintln!("  {} {}", "Site:".dimmed(), site.bright_white());
            }
            eprintln!("  {} {}", "Characters:".dimmed(), article.text.chars().count().to_string().bright_white());
        }
    }
    eprintln!();
}

/// Format a byte count for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

use monitor_core::{AppViewModel, BarStyle, LogEntry, Panel, ProgressBarView};

use super::constants::{LOG_MIN_ROWS, PROGRESS_BAR_WIDTH};
use super::layout::{key_legend, section_rule, title_line, FIXED_ROWS};

pub struct RenderContext<'a> {
    pub server_url: &'a str,
    /// Absolute form of `view.download_href`, when it could be resolved.
    pub download_url: Option<&'a str>,
    pub width: u16,
    pub height: u16,
    /// Entries hidden below the viewport; 0 shows the newest entries.
    pub log_offset: usize,
}

pub fn log_rows(height: u16) -> usize {
    (height as usize).saturating_sub(FIXED_ROWS).max(LOG_MIN_ROWS)
}

/// Largest useful scroll offset for a log of `len` entries.
pub fn max_log_offset(len: usize, height: u16) -> usize {
    len.saturating_sub(log_rows(height))
}

pub fn render(view: &AppViewModel, ctx: &RenderContext<'_>) -> Vec<String> {
    let width = ctx.width.max(20) as usize;
    let mut lines = Vec::with_capacity(ctx.height as usize);

    lines.push(title_line(ctx.server_url));
    lines.push(if view.start_button.enabled {
        format!("[ {} ]", view.start_button.label)
    } else {
        format!("[ {} ] (disabled)", view.start_button.label)
    });

    lines.push(section_rule("Status", width));
    lines.push(format!(
        "Status: {:<8} Total pins: {:<6} Current pin: {}",
        view.stats.status_text, view.stats.total_pins, view.stats.current_pin
    ));
    lines.push(format!("Message: {}", view.stats.status_message));

    let (panel_title, panel_lines) = panel_content(view, ctx);
    lines.push(section_rule(panel_title, width));
    lines.extend(panel_lines);

    let rows = log_rows(ctx.height);
    let offset = ctx.log_offset.min(max_log_offset(view.log.len(), ctx.height));
    let log_title = if offset == 0 {
        format!("Log ({})", view.log.len())
    } else {
        format!("Log ({}, {} newer hidden)", view.log.len(), offset)
    };
    lines.push(section_rule(&log_title, width));
    let end = view.log.len() - offset;
    let start = end.saturating_sub(rows);
    let visible = &view.log[start..end];
    lines.extend(visible.iter().map(format_log_entry));
    lines.extend(std::iter::repeat(String::new()).take(rows - visible.len()));

    lines.push(section_rule("Keys", width));
    lines.push(key_legend(view.is_visible(Panel::Error)));

    lines
        .into_iter()
        .map(|line| truncate(&line, width))
        .collect()
}

fn panel_content(view: &AppViewModel, ctx: &RenderContext<'_>) -> (&'static str, [String; 2]) {
    match view.visible_panel {
        Some(Panel::Progress) => (
            "Progress",
            [format_progress_bar(&view.progress_bar), String::new()],
        ),
        Some(Panel::Results) => {
            let download = match (ctx.download_url, view.download_href.as_deref()) {
                (Some(url), _) => format!("Download: {url}"),
                (None, Some(href)) => format!("Download: {href}"),
                (None, None) => "No file was exported".to_string(),
            };
            ("Results", [format!("Done: {}", view.results_message), download])
        }
        Some(Panel::Error) => (
            "Error",
            [
                format!("Error: {}", view.error_message),
                "Press [r] to retry".to_string(),
            ],
        ),
        None => ("Idle", ["Press [s] to start".to_string(), String::new()]),
    }
}

fn format_progress_bar(bar: &ProgressBarView) -> String {
    let filled = ((bar.percent / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    let state = match bar.style {
        BarStyle::Active => "in progress",
        BarStyle::Success => "complete",
        BarStyle::Danger => "failed",
    };
    format!(
        "[{}{}] {:>6}  {}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        bar.text,
        state
    )
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!("{:<7} {}", entry.level.as_str(), entry)
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        line.to_string()
    } else {
        line.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::{update, AppState, Clock, Msg, StartReply, StatusSnapshot};

    fn ctx(height: u16, log_offset: usize) -> RenderContext<'static> {
        RenderContext {
            server_url: "http://127.0.0.1:5000",
            download_url: Some("http://127.0.0.1:5000/download/out.csv"),
            width: 100,
            height,
            log_offset,
        }
    }

    fn running_state() -> AppState {
        let state = AppState::new().with_clock(Clock::fixed("08:00:00"));
        let (state, _) = update(state, Msg::StartClicked);
        let (state, _) = update(state, Msg::StartResponded(Ok(StartReply::Accepted)));
        let (state, _) = update(
            state,
            Msg::StatusReceived(Ok(StatusSnapshot {
                running: true,
                progress: 50.0,
                message: "Cleaning record 3 of 6".to_string(),
                total_pins: 6,
                current_pin: 6,
                ..StatusSnapshot::default()
            })),
        );
        state
    }

    #[test]
    fn frame_fills_the_terminal_height() {
        let view = running_state().view();
        for height in [20u16, 30, 45] {
            let lines = render(&view, &ctx(height, 0));
            assert_eq!(lines.len(), FIXED_ROWS + log_rows(height));
        }
    }

    #[test]
    fn running_frame_shows_bar_and_stats() {
        let view = running_state().view();
        let lines = render(&view, &ctx(30, 0));

        assert_eq!(lines[1], "[ Starting... ] (disabled)");
        assert!(lines[3].starts_with("Status: Running"));
        assert!(lines[3].contains("Total pins: 6"));
        assert_eq!(lines[4], "Message: Cleaning record 3 of 6");
        let bar = &lines[6];
        assert!(bar.starts_with(&format!("[{}{}]", "#".repeat(20), "-".repeat(20))));
        assert!(bar.contains("50%"));
        assert!(bar.ends_with("in progress"));
    }

    #[test]
    fn log_viewport_follows_tail_and_scrolls_back() {
        let mut state = running_state();
        for tick in 0..10 {
            let (next, _) = update(
                state,
                Msg::StatusReceived(Ok(StatusSnapshot {
                    running: true,
                    progress: 60.0,
                    message: format!("step {tick}"),
                    ..StatusSnapshot::default()
                })),
            );
            state = next;
        }
        let view = state.view();
        let log_start = 9;
        let rows = log_rows(20);
        assert!(view.log.len() > rows);

        let lines = render(&view, &ctx(20, 0));
        assert_eq!(lines[8], section_rule(&format!("Log ({})", view.log.len()), 100));
        assert!(lines[log_start + rows - 1].ends_with("step 9"));

        let scrolled = render(&view, &ctx(20, 1));
        assert!(scrolled[8].contains("1 newer hidden"));
        assert!(scrolled[log_start + rows - 1].ends_with("step 8"));

        // Offsets past the oldest entry are clamped.
        let top = render(&view, &ctx(20, usize::MAX));
        assert!(top[log_start].contains("Starting scraping process..."));
    }

    #[test]
    fn results_panel_shows_resolved_download_link() {
        let (state, _) = update(
            running_state(),
            Msg::StatusReceived(Ok(StatusSnapshot {
                completed: true,
                progress: 100.0,
                message: "Exported 6 records".to_string(),
                csv_file: Some("out.csv".to_string()),
                ..StatusSnapshot::default()
            })),
        );
        let lines = render(&state.view(), &ctx(30, 0));

        assert_eq!(lines[1], "[ Start Scraping ]");
        assert!(lines[5].starts_with("-- Results "));
        assert_eq!(lines[6], "Done: Exported 6 records");
        assert_eq!(lines[7], "Download: http://127.0.0.1:5000/download/out.csv");
    }

    #[test]
    fn error_panel_offers_retry() {
        let (state, _) = update(
            running_state(),
            Msg::StatusReceived(Ok(StatusSnapshot {
                error: Some("boom".to_string()),
                ..StatusSnapshot::default()
            })),
        );
        let lines = render(&state.view(), &ctx(30, 0));

        assert_eq!(lines[6], "Error: boom");
        assert!(lines.last().unwrap().contains("[r] retry"));
    }

    #[test]
    fn long_lines_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abcd");
        assert_eq!(truncate("ab", 4), "ab");
    }
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};

use crate::App;
use rondo::timer::Phase;
use rondo::util::format_duration;

const HORIZONTAL_MARGIN: u16 = 5;

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Work => Color::Green,
        Phase::Rest => Color::Blue,
        Phase::RoundRest => Color::Cyan,
        Phase::Finished => Color::Magenta,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let timer = &self.session.timer;
        let plan = timer.plan();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let phase_style = Style::default()
            .patch(bold_style)
            .fg(phase_color(timer.phase));

        // Pulse the countdown over the last three seconds of a phase.
        let countdown_style = if timer.running && timer.remaining_secs <= 3 {
            Style::default()
                .patch(bold_style)
                .fg(Color::Red)
                .add_modifier(Modifier::SLOW_BLINK)
        } else {
            phase_style
        };

        let body_height = 11u16;
        let top_pad = area.height.saturating_sub(body_height) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(top_pad),
                    Constraint::Length(1), // round/exercise header
                    Constraint::Length(1),
                    Constraint::Length(1), // phase banner
                    Constraint::Length(2), // countdown
                    Constraint::Length(1), // progress gauge
                    Constraint::Length(2), // finished banner
                    Constraint::Length(1), // toggles
                    Constraint::Length(1), // key help
                    Constraint::Length(1), // notice
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Round {}/{}", timer.round_index, plan.rounds),
                bold_style,
            ),
            Span::raw(" · "),
            Span::styled(
                format!(
                    "Exercise {}/{}",
                    timer.exercise_index, plan.exercises_per_round
                ),
                bold_style,
            ),
            Span::styled(
                format!("   total {}", format_duration(plan.total_secs())),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[1], buf);

        // A fresh paused session reads as idle rather than mid-work.
        let banner_text = if timer.is_fresh() && !timer.running {
            "READY".to_string()
        } else {
            timer.phase.to_string().to_uppercase()
        };
        let banner = Paragraph::new(Span::styled(banner_text, phase_style))
            .alignment(Alignment::Center);
        banner.render(chunks[3], buf);

        let countdown = Paragraph::new(Span::styled(
            format_duration(u64::from(timer.remaining_secs)),
            countdown_style,
        ))
        .alignment(Alignment::Center);
        countdown.render(chunks[4], buf);

        let phase_total = timer.phase_secs();
        let ratio = if timer.finished || phase_total == 0 {
            1.0
        } else {
            f64::from(phase_total - timer.remaining_secs.min(phase_total)) / f64::from(phase_total)
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(phase_color(timer.phase)))
            .ratio(ratio)
            .label("");
        gauge.render(chunks[5], buf);

        if timer.finished {
            let done = Paragraph::new(Span::styled(
                "Workout complete! Press (r) to go again",
                Style::default().patch(bold_style).fg(Color::Green),
            ))
            .alignment(Alignment::Center);
            done.render(chunks[6], buf);
        }

        let toggles = Paragraph::new(Line::from(vec![
            Span::styled(
                if self.session.sound_on() {
                    "sound on"
                } else {
                    "sound off"
                },
                dim_style,
            ),
            Span::raw("  "),
            Span::styled(
                if self.session.keep_screen_on {
                    "screen-wake on"
                } else {
                    "screen-wake off"
                },
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        toggles.render(chunks[7], buf);

        let help = Paragraph::new(Span::styled(
            "(space) start/pause  (r) reset  (s) sound  (k) screen  (t) test voice  (esc) quit",
            dim_style,
        ))
        .alignment(Alignment::Center);
        help.render(chunks[8], buf);

        if let Some(notice) = &self.session.notice {
            let line = Paragraph::new(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow).patch(dim_style),
            ))
            .alignment(Alignment::Center);
            line.render(chunks[9], buf);
        }
    }
}

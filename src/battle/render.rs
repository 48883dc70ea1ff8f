//! Battle screen.
//!
//! Layout: header (level + XP) / combatant panels / action controls / log.
//! Panels sit side by side on wide screens and stack on narrow ones.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::config::ATTACK_MANA_REGEN;
use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::engine::PlayerAction;
use super::narration::{FloatKind, LogCategory, Side};
use super::presenter::{continuation_label, TerminalView};
use super::state::{Enemy, Phase, Player};

pub fn render(
    view: &TerminalView,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let borders = borders_for(area.width);
    let is_narrow = is_narrow_layout(area.width);

    let controls = control_list(view);
    let controls_h = controls.visual_height(inner_width(area.width, borders)) + 2;
    let scene_h = if is_narrow { 11 } else { 6 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(scene_h),
            Constraint::Length(controls_h),
            Constraint::Min(3),
        ])
        .split(area);

    render_header(view, f, chunks[0], borders, is_narrow);
    render_scene(view, f, chunks[1], borders, is_narrow);
    render_controls(view, controls, f, chunks[2], borders, click_state);
    render_log(view, f, chunks[3], borders);
}

// ── Helpers ─────────────────────────────────────────────────

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    }
}

fn inner_width(area_width: u16, borders: Borders) -> u16 {
    let sides = borders.contains(Borders::LEFT) as u16 + borders.contains(Borders::RIGHT) as u16;
    area_width.saturating_sub(sides)
}

fn gauge(current: u32, max: u32, width: usize) -> String {
    let ratio = if max > 0 {
        current.min(max) as f64 / max as f64
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    "\u{2588}".repeat(filled) + &"\u{2591}".repeat(empty)
}

/// Red once health drops under 30%.
fn health_color(current: u32, max: u32, healthy: Color) -> Color {
    if (current as u64) * 100 < (max as u64) * 30 {
        Color::Red
    } else {
        healthy
    }
}

fn stat_line(label: &str, current: u32, max: u32, width: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray)),
        Span::styled(gauge(current, max, width), Style::default().fg(color)),
        Span::styled(format!(" {}/{}", current, max), Style::default().fg(Color::White)),
    ])
}

fn float_line(view: &TerminalView, side: Side) -> Line<'static> {
    let spans: Vec<Span> = view
        .floats()
        .iter()
        .filter(|ft| ft.side == side)
        .map(|ft| {
            let color = match ft.kind {
                FloatKind::Damage if ft.emphasized => Color::LightYellow,
                FloatKind::Damage => Color::LightRed,
                FloatKind::Heal => Color::Green,
                FloatKind::Mana => Color::Blue,
            };
            let mut style = Style::default().fg(color);
            if ft.emphasized {
                style = style.add_modifier(Modifier::BOLD);
            }
            Span::styled(format!(" {}", ft.label()), style)
        })
        .collect();
    Line::from(spans)
}

/// Shaking panels are nudged one column right.
fn shake_pad(view: &TerminalView, side: Side) -> &'static str {
    if view.shaking(side) { "  " } else { " " }
}

// ── Header ──────────────────────────────────────────────────

fn render_header(
    view: &TerminalView,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    is_narrow: bool,
) {
    let player = &view.snapshot().player;
    let xp_w = if is_narrow { 8 } else { 16 };

    let line = Line::from(vec![
        Span::styled(
            format!(" LVL {}", player.level),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  Experience {} / {} ", player.experience, player.experience_required),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            gauge(player.experience, player.experience_required, xp_w),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let title = if is_narrow { " Duel " } else { " Dungeon Duel " };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
    f.render_widget(Paragraph::new(vec![line]).block(block), area);
}

// ── Combatants ──────────────────────────────────────────────

fn render_scene(view: &TerminalView, f: &mut Frame, area: Rect, borders: Borders, is_narrow: bool) {
    let state = view.snapshot();
    let bar_w = if is_narrow { 10 } else { 14 };

    let panels = if is_narrow {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(5)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };

    let player_lines = player_panel(view, &state.player, bar_w);
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Green));
    f.render_widget(Paragraph::new(player_lines).block(block), panels[0]);

    let enemy_lines = match &state.enemy {
        Some(enemy) => enemy_panel(view, enemy, bar_w),
        None => vec![Line::from(Span::styled(
            " The dungeon is quiet...",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::LightRed));
    f.render_widget(Paragraph::new(enemy_lines).block(block), panels[1]);
}

fn player_panel(view: &TerminalView, player: &Player, bar_w: usize) -> Vec<Line<'static>> {
    let pad = shake_pad(view, Side::Player);
    vec![
        Line::from(Span::styled(
            format!("{}\u{1f6e1}\u{fe0f} Hero", pad),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        stat_line(
            "HP",
            player.current_health,
            player.max_health,
            bar_w,
            health_color(player.current_health, player.max_health, Color::Green),
        ),
        stat_line("MP", player.current_mana, player.max_mana, bar_w, Color::Blue),
        float_line(view, Side::Player),
    ]
}

fn enemy_panel(view: &TerminalView, enemy: &Enemy, bar_w: usize) -> Vec<Line<'static>> {
    let pad = shake_pad(view, Side::Enemy);
    vec![
        Line::from(vec![
            Span::styled(
                format!("{}{} {}", pad, enemy.glyph(), enemy.name()),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" Lvl {}", enemy.level), Style::default().fg(Color::Gray)),
        ]),
        stat_line(
            "HP",
            enemy.current_health,
            enemy.max_health,
            bar_w,
            health_color(enemy.current_health, enemy.max_health, Color::LightRed),
        ),
        float_line(view, Side::Enemy),
    ]
}

// ── Controls ────────────────────────────────────────────────

fn control_list(view: &TerminalView) -> ClickableList<'static> {
    let mut cl = ClickableList::new();

    if let Some(won) = view.continuation() {
        push_control(&mut cl, 'R', continuation_label(won).to_string(), CONTINUE, true);
        return cl;
    }

    let enabled = view.controls_enabled();
    let mana = view.snapshot().player.current_mana;
    let fireball = PlayerAction::SpecialAttack.mana_cost();
    let heal = PlayerAction::Heal.mana_cost();

    push_control(
        &mut cl,
        '1',
        format!("\u{2694}\u{fe0f} Attack (+{} MP)", ATTACK_MANA_REGEN),
        ATTACK,
        enabled,
    );
    push_control(
        &mut cl,
        '2',
        format!("\u{1f525} Fireball ({} MP)", fireball),
        FIREBALL,
        enabled && mana >= fireball,
    );
    push_control(
        &mut cl,
        '3',
        format!("\u{2728} Heal ({} MP)", heal),
        HEAL,
        enabled && mana >= heal,
    );
    cl
}

/// Dim controls stay clickable so a short-on-mana tap still gets feedback.
fn push_control(
    cl: &mut ClickableList<'static>,
    key: char,
    label: String,
    action_id: u16,
    active: bool,
) {
    let (key_color, label_color) = if active {
        (Color::Cyan, Color::White)
    } else {
        (Color::DarkGray, Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(key_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(label_color)),
        ]),
        action_id,
    );
}

fn render_controls(
    view: &TerminalView,
    controls: ClickableList<'static>,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let title = match view.snapshot().phase() {
        Phase::AwaitingEnemyAction => " Enemy turn... ",
        Phase::Over(_) => " Battle over ",
        _ => " Actions ",
    };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(title, Style::default().fg(Color::Yellow)));

    let mut cs = click_state.borrow_mut();
    controls.register_targets(area, &mut cs, 1, 1, 0, inner_width(area.width, borders));
    drop(cs);

    f.render_widget(
        Paragraph::new(controls.into_lines()).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Log ─────────────────────────────────────────────────────

fn log_style(category: LogCategory) -> Style {
    match category {
        LogCategory::System => Style::default().fg(Color::Gray),
        LogCategory::Player => Style::default().fg(Color::White),
        LogCategory::Enemy => Style::default().fg(Color::LightRed),
        LogCategory::Magic => Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
        LogCategory::Heal => Style::default().fg(Color::Green),
    }
}

/// Sticks to the newest entry.
fn render_log(view: &TerminalView, f: &mut Frame, area: Rect, borders: Borders) {
    let lines: Vec<Line> = view
        .log()
        .iter()
        .map(|entry| {
            Line::from(Span::styled(
                format!(" > {}", entry.text),
                log_style(entry.category),
            ))
        })
        .collect();

    let inner_h = area.height.saturating_sub(2);
    let total = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(inner_width(area.width, borders)) as u16;
    let scroll = total.saturating_sub(inner_h);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Log ", Style::default().fg(Color::DarkGray)));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }).scroll((scroll, 0)),
        area,
    );
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::application::menu::MenuIcon;
use crate::application::page::{DeleteConfirmModel, DeletePrompt, LayoutWidth, RowRenderModel};
use crate::application::rows::{RowIcon, RowStatus, RowVariant, WorkspaceRow};
use crate::domain::{PendingAction, PolicyRole};

use super::model::{FrameModel, MenuOverlayModel};

/// Draws one frame from the prepared model. Overlays render bottom-up in
/// the same order the key router walks them top-down.
pub(super) fn draw(frame: &mut Frame<'_>, model: &FrameModel) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(header(model), header_area);
    frame.render_widget(body(model), body_area);
    frame.render_widget(footer(model), footer_area);

    if let Some(menu) = model.menu.as_ref() {
        draw_menu_overlay(frame, menu);
    }
    if let Some(confirm) = model.page.delete_confirm.as_ref() {
        draw_delete_confirm(frame, confirm);
    }
    if model.page.support_notice_open {
        draw_support_notice(frame);
    }
}

fn header(model: &FrameModel) -> Paragraph<'static> {
    let mut spans = vec![
        Span::styled(" Workspaces", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" ({})", model.page.rows.len())),
    ];
    if model.layout == LayoutWidth::Narrow {
        spans.push(Span::styled(
            "  narrow",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn body(model: &FrameModel) -> Paragraph<'static> {
    if model.page.show_loading {
        return Paragraph::new(Line::styled(
            "  Loading workspaces...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    if model.page.show_empty_state {
        return Paragraph::new(vec![
            Line::raw(""),
            Line::raw("  No workspaces yet. With a workspace you can:"),
            Line::raw(""),
            Line::raw("    - Track and collect expenses"),
            Line::raw("    - Issue company cards"),
            Line::raw("    - Pay reimbursements"),
            Line::raw(""),
            Line::raw("  Press n to create one."),
        ]);
    }

    let mut lines = Vec::with_capacity(model.page.rows.len() + 1);
    if model.page.show_column_header {
        lines.push(column_header());
    }
    for (index, row_model) in model.page.rows.iter().enumerate() {
        lines.push(row_line(model, index, row_model));
    }
    Paragraph::new(lines)
}

fn footer(model: &FrameModel) -> Paragraph<'static> {
    let text = match model.status_line.as_deref() {
        Some(status) => format!(" {status}"),
        None => hint_line(model).to_string(),
    };
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn hint_line(model: &FrameModel) -> &'static str {
    if model.page.support_notice_open {
        " esc dismiss"
    } else if model.page.delete_confirm.is_some() {
        " enter/y delete   esc/n cancel"
    } else if model.menu.is_some() {
        " j/k move   enter select   esc close"
    } else {
        " j/k move   enter open   m menu   n new   x clear error   q quit"
    }
}

fn column_header() -> Line<'static> {
    Line::styled(
        format!("    {:<32} {:<10} {}", "NAME", "ROLE", "STATUS"),
        Style::default().fg(Color::DarkGray),
    )
}

fn row_line(model: &FrameModel, index: usize, row_model: &RowRenderModel) -> Line<'static> {
    let row = &row_model.row;
    let selected = index == model.selected_row;

    let mut title_style = Style::default();
    if row.disabled {
        title_style = title_style.fg(Color::DarkGray);
    }
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(if selected { "> " } else { "  " }),
        Span::raw(format!("{} ", row_glyph(&row.icon))),
    ];
    if model.layout == LayoutWidth::Wide {
        spans.push(Span::styled(format!("{:<32}", row.title), title_style));
        spans.push(Span::raw(format!(" {:<10}", role_cell(row))));
    } else {
        spans.push(Span::styled(row.title.clone(), title_style));
    }
    spans.extend(status_markers(row_model));

    Line::from(spans)
}

fn status_markers(row_model: &RowRenderModel) -> Vec<Span<'static>> {
    let row = &row_model.row;
    let mut spans = Vec::new();
    if row.is_join_request() {
        spans.push(Span::styled(
            " join request",
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(action) = row.pending_action {
        spans.push(Span::styled(
            format!(" [{}]", pending_label(action)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    match row.status {
        Some(RowStatus::Error) => {
            spans.push(Span::styled(" !", Style::default().fg(Color::Red)));
        }
        Some(RowStatus::Info) => {
            spans.push(Span::styled(" i", Style::default().fg(Color::Cyan)));
        }
        None => {}
    }
    if !row.errors.is_empty() {
        spans.push(Span::styled(
            format!(" {} error(s), x to clear", row.errors.len()),
            Style::default().fg(Color::Red),
        ));
    }
    if row_model.spinner_active {
        spans.push(Span::styled(" ...", Style::default().fg(Color::Cyan)));
    }
    spans
}

fn row_glyph(icon: &RowIcon) -> char {
    match icon {
        RowIcon::Avatar { .. } => '@',
        RowIcon::DefaultAvatar { .. } => '#',
    }
}

fn menu_glyph(icon: MenuIcon) -> char {
    match icon {
        MenuIcon::Building => '@',
        MenuIcon::Trashcan => 'x',
        MenuIcon::Exit => '<',
        MenuIcon::Hashtag => '#',
        MenuIcon::Star => '*',
    }
}

fn role_cell(row: &WorkspaceRow) -> &'static str {
    match &row.variant {
        RowVariant::Member { role, .. } => match role {
            PolicyRole::Admin => "admin",
            PolicyRole::Auditor => "auditor",
            PolicyRole::User => "member",
        },
        RowVariant::JoinRequest { .. } => "-",
    }
}

fn pending_label(action: PendingAction) -> &'static str {
    match action {
        PendingAction::Add => "adding",
        PendingAction::Update => "updating",
        PendingAction::Delete => "deleting",
    }
}

fn menu_width(menu: &MenuOverlayModel) -> u16 {
    let label_width = menu
        .entries
        .iter()
        .map(|entry| entry.label.len())
        .max()
        .unwrap_or(0)
        .max(menu.row_title.len());
    (label_width as u16).saturating_add(10).min(60)
}

fn draw_menu_overlay(frame: &mut Frame<'_>, menu: &MenuOverlayModel) {
    let height = menu.entries.len() as u16 + 2;
    let area = centered_rect(menu_width(menu), height, frame.area());

    let lines: Vec<Line<'static>> = menu
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let selected = index == menu.selected_entry;
            let marker = if selected { "> " } else { "  " };
            let spinner = if entry.shows_spinner { " ..." } else { "" };
            let mut style = Style::default();
            if selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(
                format!("{marker}{} {}{spinner}", menu_glyph(entry.icon), entry.label),
                style,
            )
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(menu.row_title.clone())
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn draw_delete_confirm(frame: &mut Frame<'_>, confirm: &DeleteConfirmModel) {
    let area = centered_rect(56, 7, frame.area());
    let body = match confirm.prompt {
        DeletePrompt::Standard => format!(
            "Are you sure you want to delete {}?",
            confirm.workspace_name
        ),
        DeletePrompt::WithCardFeeds => format!(
            "Deleting {} will also remove its card feeds and deactivate all assigned cards. Are you sure?",
            confirm.workspace_name
        ),
    };

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::raw(body),
            Line::raw(""),
            Line::styled(
                "enter/y delete   esc/n cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Delete workspace")
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn draw_support_notice(frame: &mut Frame<'_>) {
    let area = centered_rect(52, 6, frame.area());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::raw("This action is not available while signed in"),
            Line::raw("as support."),
            Line::raw(""),
            Line::styled("esc dismiss", Style::default().fg(Color::DarkGray)),
        ])
        .block(
            Block::default()
                .title("Restricted action")
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, centered, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(middle);
    centered
}

#[cfg(test)]
mod tests;

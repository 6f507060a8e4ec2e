use std::borrow::Cow;

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::state::BrowseUi;
use hostelbite::source::types::Meal;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, ui: &BrowseUi, spinner_frame: u8) {
    if ui.show_detail {
        if let Some(meal) = ui.selected_meal() {
            draw_detail(f, ui, meal);
            return;
        }
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, ui, chunks[0], spinner_frame);
    draw_filters(f, ui, chunks[1]);
    draw_meals(f, ui, chunks[2]);
    draw_status(f, ui, chunks[3], spinner_frame);
    draw_footer(f, ui, chunks[4]);
}

fn draw_header(f: &mut Frame, ui: &BrowseUi, area: Rect, spinner_frame: u8) {
    let snapshot = &ui.snapshot;

    let source_status = if snapshot.error.is_some() {
        Span::styled("ERR", Style::default().fg(Color::Red))
    } else {
        Span::styled("OK", Style::default().fg(Color::Green))
    };

    let activity = if snapshot.loading {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        Span::styled(format!(" {} FETCHING", ch), Style::default().fg(Color::Cyan))
    } else {
        Span::styled(" IDLE", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::raw(format!(
            " {} of {} meals",
            snapshot.items.len(),
            snapshot.total
        )),
        Span::raw(" | Source: "),
        source_status,
        activity,
    ]);

    let title = if ui.offline {
        " HostelBite Meals [OFFLINE] ".to_string()
    } else {
        " HostelBite Meals ".to_string()
    };
    let title_style = if ui.offline {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_filters(f: &mut Frame, ui: &BrowseUi, area: Rect) {
    let search_span = if ui.search_mode {
        Span::styled(
            format!("{}\u{258f}", ui.search),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else if ui.search.is_empty() {
        Span::styled("\u{2014}", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(ui.search.clone())
    };

    let sort_text = ui
        .sort
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());

    let line = Line::from(vec![
        Span::styled(" Search: ", Style::default().fg(Color::DarkGray)),
        search_span,
        Span::styled(" | Category: ", Style::default().fg(Color::DarkGray)),
        Span::raw(ui.category.to_string()),
        Span::styled(" | Price: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{} - {}",
            format_taka(ui.min_price),
            format_taka(ui.max_price)
        )),
        Span::styled(" | Sort: ", Style::default().fg(Color::DarkGray)),
        Span::raw(sort_text),
    ]);

    let title = if ui.search_mode {
        Span::styled(" Filters [typing] ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(" Filters ")
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_meals(f: &mut Frame, ui: &BrowseUi, area: Rect) {
    let snapshot = &ui.snapshot;
    let inner_width = area.width.saturating_sub(2) as usize;

    if snapshot.items.is_empty() {
        let message = if snapshot.loading {
            Span::styled("Loading meals...", Style::default().fg(Color::Cyan))
        } else if snapshot.error.is_some() {
            Span::styled(
                "Could not load meals",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "No meals match your filters",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let lines = vec![
            Line::from(""),
            Line::from(message),
            Line::from(""),
            Line::from(Span::styled(
                "adjust the filters above to widen the search",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let block = Block::default().title(" Meals ").borders(Borders::ALL);
        let para = Paragraph::new(lines).alignment(Alignment::Center).block(block);
        f.render_widget(para, area);
        return;
    }

    // Fixed column widths: Category=11 Price=9 Rating=7 Likes=7 = 34
    // Drop order: Rating(7), Likes(7)
    let show_rating = inner_width >= 54;
    let show_likes = inner_width >= 44;
    let fixed: usize = 11 + 9 + if show_rating { 7 } else { 0 } + if show_likes { 7 } else { 0 };
    let title_w = inner_width.saturating_sub(fixed).max(8);

    let mut headers = vec!["Title", "Category", "Price"];
    if show_rating {
        headers.push("Rating");
    }
    if show_likes {
        headers.push("Likes");
    }
    let header = Row::new(headers).style(Style::default().add_modifier(Modifier::BOLD));

    let mut constraints = vec![
        Constraint::Length(title_w as u16),
        Constraint::Length(11),
        Constraint::Length(9),
    ];
    if show_rating {
        constraints.push(Constraint::Length(7));
    }
    if show_likes {
        constraints.push(Constraint::Length(7));
    }

    let rows: Vec<Row> = snapshot
        .items
        .iter()
        .map(|meal| {
            let category_color = match meal.category.as_str() {
                "Breakfast" => Color::Yellow,
                "Lunch" => Color::Green,
                "Dinner" => Color::Cyan,
                _ => Color::DarkGray,
            };
            let mut cells = vec![
                Cell::from(truncate_with_ellipsis(&meal.title, title_w).into_owned()),
                Cell::from(meal.category.clone())
                    .style(Style::default().fg(category_color)),
                Cell::from(format_taka(meal.price)),
            ];
            if show_rating {
                let rating_color = if meal.rating >= 4.5 {
                    Color::Green
                } else if meal.rating >= 4.0 {
                    Color::Yellow
                } else {
                    Color::DarkGray
                };
                cells.push(
                    Cell::from(format!("{:.1}", meal.rating))
                        .style(Style::default().fg(rating_color)),
                );
            }
            if show_likes {
                cells.push(Cell::from(meal.likes.to_string()));
            }
            Row::new(cells)
        })
        .collect();

    let title = format!(" Meals [{}/{}] ", snapshot.items.len(), snapshot.total);
    let table = Table::new(rows, constraints)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut table_state = TableState::default();
    table_state.select(Some(ui.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_status(f: &mut Frame, ui: &BrowseUi, area: Rect, spinner_frame: u8) {
    let snapshot = &ui.snapshot;
    let line = if let Some(error) = &snapshot.error {
        Line::from(vec![
            Span::styled(
                format!(" couldn't load meals: {}", error),
                Style::default().fg(Color::Red),
            ),
            Span::styled("  [r]", Style::default().fg(Color::Yellow)),
            Span::raw(" to retry"),
        ])
    } else if snapshot.loading {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        Line::from(Span::styled(
            format!(" {} Loading more meals...", ch),
            Style::default().fg(Color::Cyan),
        ))
    } else if !snapshot.has_more && !snapshot.items.is_empty() {
        Line::from(Span::styled(
            " You've reached the end.",
            Style::default().fg(Color::DarkGray),
        ))
    } else if snapshot.has_more {
        let remaining = snapshot.total.saturating_sub(snapshot.items.len() as u64);
        Line::from(Span::styled(
            format!(" {} more below", remaining),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, ui: &BrowseUi, area: Rect) {
    let line = if ui.search_mode {
        Line::from(vec![
            Span::raw("  typing filters as you go  "),
            Span::styled("[Enter/Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" done  "),
        ])
    } else {
        Line::from(vec![
            Span::styled("  [/]", Style::default().fg(Color::Yellow)),
            Span::raw(" search  "),
            Span::styled("[c]", Style::default().fg(Color::Yellow)),
            Span::raw("ategory  "),
            Span::styled("[s]", Style::default().fg(Color::Yellow)),
            Span::raw("ort  "),
            Span::styled("[[/]]", Style::default().fg(Color::Yellow)),
            Span::raw(" min  "),
            Span::styled("[{/}]", Style::default().fg(Color::Yellow)),
            Span::raw(" max  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" view  "),
            Span::styled("[r]", Style::default().fg(Color::Yellow)),
            Span::raw("etry  "),
            Span::styled("[g]", Style::default().fg(Color::Yellow)),
            Span::raw(" reload  "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw("uit  "),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_detail(f: &mut Frame, ui: &BrowseUi, meal: &Meal) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let summary = Line::from(vec![
        Span::raw(format!(" {} | ", meal.category)),
        Span::styled(
            format_taka(meal.price),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " | rating {:.1} | {} likes | {} reviews",
            meal.rating, meal.likes, meal.reviews_count
        )),
    ]);
    let header = Block::default()
        .title(format!(" {} ", meal.title))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(summary).block(header), chunks[0]);

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Distributor: ", label),
            Span::raw(format!(
                "{} <{}>",
                meal.distributor_name, meal.distributor_email
            )),
        ]),
        Line::from(vec![
            Span::styled(" Posted: ", label),
            Span::raw(format_posted(meal.post_time)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Ingredients: ", label),
            Span::raw(meal.ingredients.clone()),
        ]),
        Line::from(""),
        Line::from(Span::raw(format!(" {}", meal.description))),
    ];
    if !meal.image.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" Image: {}", meal.image),
            label,
        )));
    }
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[1]);

    let footer = Line::from(vec![
        Span::styled("  [Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" back  "),
        Span::styled("[q]", Style::default().fg(Color::Yellow)),
        Span::raw("uit  "),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

fn format_taka(price: f64) -> String {
    format!("\u{09f3}{:.0}", price)
}

fn format_posted(post_time: Option<DateTime<Utc>>) -> String {
    post_time
        .map(|t| t.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "\u{2014}".to_string())
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}

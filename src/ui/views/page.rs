//! Pokémon page view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::MoveTable;
use crate::api::types::{Encounter, Evolution, Matchup, NavLink, PokemonPage, TypeMatchups};
use crate::ui::theme::{type_color, Theme};

/// Tallest the matchup/evolution row grows before its text wraps out of view.
const MAX_CHART_HEIGHT: u16 = 9;

/// Render a loaded page: header, stats, facts, type chart, evolutions,
/// moves and the prev/next bar.
pub fn render_page(
    frame: &mut Frame,
    area: Rect,
    page: &PokemonPage,
    moves: &MoveTable,
    filter_focused: bool,
    theme: &Theme,
) {
    let stats_height = (page.stats.len() as u16 + 3)
        .max(facts_height(page))
        .max(6);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(stats_height),
            Constraint::Length(chart_height(page)),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], page, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_stats(frame, middle[0], page, theme);
    render_facts(frame, middle[1], page, theme);

    if chunks[2].height > 0 {
        render_chart_row(frame, chunks[2], page, theme);
    }

    moves.render(frame, chunks[3], filter_focused, theme);
    render_nav(frame, chunks[4], page, theme);
}

/// Rows the profile panel needs, borders included. Flavor text is given
/// two wrapped lines after a blank one.
fn facts_height(page: &PokemonPage) -> u16 {
    let mut rows = 5 + 2;
    if !page.forms.is_empty() {
        rows += 1;
    }
    if !page.flavor_text.is_empty() {
        rows += 3;
    }
    rows
}

/// Height of the matchup/evolution/location row; zero hides it.
fn chart_height(page: &PokemonPage) -> u16 {
    if page.type_matchups.is_empty() && page.evolutions.is_empty() && page.encounters.is_empty()
    {
        return 0;
    }
    let tallest = page.evolutions.len().max(page.encounters.len()).max(3) as u16;
    (tallest + 2).min(MAX_CHART_HEIGHT)
}

/// Render the placeholder shown before any page is loaded.
pub fn render_welcome(frame: &mut Frame, area: Rect, loading: Option<&str>, theme: &Theme) {
    let lines = match loading {
        Some(identifier) => vec![Line::from(Span::styled(
            format!("Loading {}…", identifier),
            theme.muted(),
        ))],
        None => vec![
            Line::from(Span::styled("PokeBase", theme.title())),
            Line::from(""),
            Line::from(Span::styled(
                "Type a name to search, ↑/↓ to pick a suggestion, Enter to open.",
                theme.muted(),
            )),
            Line::from(Span::styled(
                "/ or Ctrl+K focuses search · Tab cycles focus · ? for help",
                theme.muted(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Pages load from the server's /api/pokemon/<name> JSON route;",
                theme.muted(),
            )),
            Line::from(Span::styled(
                "a server without it answers every page with \"not found\".",
                theme.muted(),
            )),
        ],
    };

    let y = area.y + area.height / 3;
    let rect = Rect::new(area.x, y, area.width, area.height.saturating_sub(y - area.y));
    frame.render_widget(
        Paragraph::new(lines)
            .style(theme.base())
            .alignment(Alignment::Center),
        rect,
    );
}

fn render_header(frame: &mut Frame, area: Rect, page: &PokemonPage, theme: &Theme) {
    let mut spans = vec![
        Span::styled(format!("#{:03} ", page.dex), theme.muted()),
        Span::styled(page.display_name.as_str(), theme.title()),
        Span::raw("  "),
    ];

    for t in &page.types {
        spans.push(Span::styled(
            format!(" {} ", t.name),
            Style::default()
                .fg(theme.bg)
                .bg(type_color(&t.identifier))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(generation) = &page.generation {
        let origin = match &page.region {
            Some(region) => format!("  {} · {}", generation, region),
            None => format!("  {}", generation),
        };
        spans.push(Span::styled(origin, theme.muted()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.base()), area);
}

fn render_stats(frame: &mut Frame, area: Rect, page: &PokemonPage, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Base stats · total {} ", page.total),
            theme.title(),
        ))
        .borders(Borders::ALL)
        .border_style(theme.border(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); page.stats.len()])
        .split(inner);

    for (stat, row) in page.stats.iter().zip(rows.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(16), Constraint::Min(4)])
            .split(*row);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{:<11}", stat.name), theme.muted()),
                Span::styled(format!("{:>4}", stat.value), theme.base()),
            ])),
            cols[0],
        );

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.accent).bg(theme.bg))
            .percent(stat.percent.min(100))
            .label(Span::styled(
                format!("{}–{}", stat.min, stat.max),
                theme.muted(),
            ));
        frame.render_widget(gauge, cols[1]);
    }
}

fn render_facts(frame: &mut Frame, area: Rect, page: &PokemonPage, theme: &Theme) {
    let label = |text: &'static str| Span::styled(text, theme.muted());
    let or_missing = |value: Option<String>| value.unwrap_or_else(|| "—".to_string());

    let abilities = page
        .abilities
        .iter()
        .map(|a| {
            if a.is_hidden {
                format!("{} (hidden)", a.name)
            } else {
                a.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        Line::from(vec![label("Abilities   "), Span::raw(abilities)]),
        Line::from(vec![
            label("Growth      "),
            Span::raw(or_missing(page.growth_rate.clone())),
        ]),
        Line::from(vec![
            label("Catch rate  "),
            Span::raw(or_missing(page.capture_rate.map(|c| c.to_string()))),
        ]),
        Line::from(vec![
            label("Happiness   "),
            Span::raw(or_missing(page.base_happiness.map(|h| h.to_string()))),
        ]),
        Line::from(vec![
            label("Egg groups  "),
            Span::raw(page.egg_groups.join(", ")),
        ]),
    ];

    if !page.forms.is_empty() {
        let forms = page
            .forms
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(vec![label("Forms       "), Span::raw(forms)]));
    }

    if !page.flavor_text.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            page.flavor_text.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .style(theme.base())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(" Profile ", theme.title()))
                    .borders(Borders::ALL)
                    .border_style(theme.border(false)),
            ),
        area,
    );
}

fn render_chart_row(frame: &mut Frame, area: Rect, page: &PokemonPage, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(area);

    let panel = |title: &'static str| {
        Block::default()
            .title(Span::styled(title, theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(false))
    };

    frame.render_widget(
        Paragraph::new(matchup_lines(&page.type_matchups, theme))
            .style(theme.base())
            .wrap(Wrap { trim: true })
            .block(panel(" Type matchups ")),
        columns[0],
    );

    let evolutions: Vec<Line> = if page.evolutions.is_empty() {
        vec![Line::from(Span::styled("Does not evolve", theme.muted()))]
    } else {
        page.evolutions
            .iter()
            .map(|evo| {
                let style = if touches_species(evo, page.dex) {
                    theme.base().add_modifier(Modifier::BOLD)
                } else {
                    theme.base()
                };
                Line::styled(evolution_label(evo), style)
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(evolutions)
            .style(theme.base())
            .wrap(Wrap { trim: true })
            .block(panel(" Evolution ")),
        columns[1],
    );

    let encounters: Vec<Line> = if page.encounters.is_empty() {
        vec![Line::from(Span::styled("Not found in the wild", theme.muted()))]
    } else {
        page.encounters
            .iter()
            .map(|e| Line::from(encounter_label(e)))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(encounters)
            .style(theme.base())
            .wrap(Wrap { trim: true })
            .block(panel(" Where to find ")),
        columns[2],
    );
}

fn matchup_lines(matchups: &TypeMatchups, theme: &Theme) -> Vec<Line<'static>> {
    [
        ("Weak     ", &matchups.weak),
        ("Resists  ", &matchups.resist),
        ("Immune   ", &matchups.immune),
    ]
    .into_iter()
    .map(|(heading, group)| {
        let mut spans = vec![Span::styled(heading, theme.muted())];
        if group.is_empty() {
            spans.push(Span::styled("—", theme.muted()));
        }
        for m in group {
            spans.push(matchup_badge(m, theme));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    })
    .collect()
}

fn matchup_badge(matchup: &Matchup, theme: &Theme) -> Span<'static> {
    Span::styled(
        format!(" {} {} ", matchup.name, matchup.display_label()),
        Style::default()
            .fg(theme.bg)
            .bg(type_color(&matchup.identifier)),
    )
}

/// `Pichu → Pikachu (High friendship)`; a base species stands alone.
fn evolution_label(evolution: &Evolution) -> String {
    let step = match &evolution.from {
        Some(from) => format!("{} → {}", from.display_name(), evolution.to.display_name()),
        None => evolution.to.display_name().to_string(),
    };
    if evolution.condition.is_empty() {
        step
    } else {
        format!("{} ({})", step, evolution.condition)
    }
}

fn touches_species(evolution: &Evolution, species_id: u32) -> bool {
    evolution.to.species_id == species_id
        || evolution
            .from
            .as_ref()
            .is_some_and(|f| f.species_id == species_id)
}

fn encounter_label(encounter: &Encounter) -> String {
    format!("{}: {}", encounter.version, encounter.locations.join(", "))
}

fn render_nav(frame: &mut Frame, area: Rect, page: &PokemonPage, theme: &Theme) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let prev = nav_label(page.nav_prev.as_ref(), true);
    let next = nav_label(page.nav_next.as_ref(), false);

    frame.render_widget(
        Paragraph::new(Span::styled(prev, nav_style(page.nav_prev.as_ref(), theme))),
        halves[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(next, nav_style(page.nav_next.as_ref(), theme)))
            .alignment(Alignment::Right),
        halves[1],
    );
}

fn nav_label(link: Option<&NavLink>, previous: bool) -> String {
    match (link, previous) {
        (Some(l), true) => format!("← #{:03} {}", l.dex, l.name),
        (Some(l), false) => format!("{} #{:03} →", l.name, l.dex),
        (None, _) => String::new(),
    }
}

fn nav_style(link: Option<&NavLink>, theme: &Theme) -> Style {
    match link {
        Some(l) if !l.disabled => Style::default().fg(theme.accent),
        _ => theme.muted(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SpeciesRef;
    use ratatui::{backend::TestBackend, Terminal};

    fn species(id: u32, identifier: &str, name: &str) -> SpeciesRef {
        SpeciesRef {
            species_id: id,
            identifier: identifier.to_string(),
            name: Some(name.to_string()),
        }
    }

    fn pikachu() -> PokemonPage {
        serde_json::from_value(serde_json::json!({
            "identifier": "pikachu",
            "display_name": "Pikachu",
            "dex": 25,
            "type_matchups": {
                "weak": [{"identifier": "ground", "name": "Ground", "multiplier": 2.0, "label": "×2"}],
                "resist": [{"identifier": "flying", "name": "Flying", "multiplier": 0.5, "label": "×0.5"}]
            },
            "evolutions": [{
                "from": {"species_id": 172, "identifier": "pichu", "name": "Pichu"},
                "to": {"species_id": 25, "identifier": "pikachu", "name": "Pikachu"},
                "condition": "High friendship"
            }],
            "forms": [
                {"identifier": "pikachu", "name": "Pikachu", "is_default": true},
                {"identifier": "pikachu-cosplay", "name": "Cosplay Pikachu"}
            ],
            "encounters": [{"version": "Black", "locations": ["Route 4"]}]
        }))
        .unwrap()
    }

    fn rendered(page: &PokemonPage) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let moves = MoveTable::new();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_page(frame, area, page, &moves, false, &Theme::default())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_welcome_names_page_route() {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_welcome(frame, area, None, &Theme::default())
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("/api/pokemon/<name>"));
    }

    #[test]
    fn test_evolution_labels() {
        let step = Evolution {
            from: Some(species(172, "pichu", "Pichu")),
            to: species(25, "pikachu", "Pikachu"),
            condition: "High friendship".to_string(),
        };
        assert_eq!(evolution_label(&step), "Pichu → Pikachu (High friendship)");
        assert!(touches_species(&step, 172));
        assert!(!touches_species(&step, 26));

        let base = Evolution {
            from: None,
            to: species(172, "pichu", "Pichu"),
            condition: String::new(),
        };
        assert_eq!(evolution_label(&base), "Pichu");
    }

    #[test]
    fn test_encounter_label() {
        let encounter = Encounter {
            version: "White".to_string(),
            locations: vec!["Route 4".to_string(), "Desert Resort".to_string()],
        };
        assert_eq!(encounter_label(&encounter), "White: Route 4, Desert Resort");
    }

    #[test]
    fn test_chart_row_hidden_without_data() {
        let bare: PokemonPage = serde_json::from_value(serde_json::json!({
            "identifier": "ditto", "display_name": "Ditto", "dex": 132
        }))
        .unwrap();
        assert_eq!(chart_height(&bare), 0);
        assert_eq!(chart_height(&pikachu()), 5);
    }

    #[test]
    fn test_render_page_shows_matchups_evolutions_and_forms() {
        let screen = rendered(&pikachu());
        assert!(screen.contains("Ground ×2"));
        assert!(screen.contains("Flying ×0.5"));
        assert!(screen.contains("Pichu → Pikachu (High friendship)"));
        assert!(screen.contains("Black: Route 4"));
        assert!(screen.contains("Cosplay Pikachu"));
    }

    fn link(disabled: bool) -> NavLink {
        NavLink {
            dex: 24,
            identifier: "arbok".to_string(),
            name: "Arbok".to_string(),
            disabled,
        }
    }

    #[test]
    fn test_nav_labels() {
        assert_eq!(nav_label(Some(&link(false)), true), "← #024 Arbok");
        assert_eq!(nav_label(Some(&link(false)), false), "Arbok #024 →");
        assert_eq!(nav_label(None, true), "");
    }

    #[test]
    fn test_disabled_link_is_muted() {
        let theme = Theme::default();
        assert_eq!(nav_style(Some(&link(true)), &theme), theme.muted());
        assert_ne!(nav_style(Some(&link(false)), &theme), theme.muted());
    }
}

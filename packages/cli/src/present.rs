//! `crime_tour present`: the presentation walked through in the terminal.
//!
//! Each step renders the current frame as text, then offers the actions
//! whose buttons are enabled in that frame.

use std::fmt;

use chrono::NaiveDate;
use crime_tour_filter::PeriodPreset;
use crime_tour_incident_models::DISPLAY_DATE_FORMAT;
use crime_tour_navigation::NavAction;
use crime_tour_presentation::{Event, Presenter, SessionState};
use crime_tour_presentation_models::{Frame, MarkerId, Panel};
use dialoguer::{Input, Select};

/// One walkthrough menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    Previous,
    Jump,
    NextPanel,
    PreviousPanel,
    Period,
    Quit,
}

impl Step {
    const ALL: &[Self] = &[
        Self::Next,
        Self::Previous,
        Self::Jump,
        Self::NextPanel,
        Self::PreviousPanel,
        Self::Period,
        Self::Quit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Next => "Avançar",
            Self::Previous => "Voltar",
            Self::Jump => "Ir para o incidente...",
            Self::NextPanel => "Próximo painel",
            Self::PreviousPanel => "Painel anterior",
            Self::Period => "Alterar período",
            Self::Quit => "Sair",
        }
    }

    /// Whether this step is offered for `frame`.
    const fn enabled(self, frame: &Frame) -> bool {
        match self {
            Self::Next => frame.buttons.next_incident,
            Self::Previous => frame.buttons.previous_incident,
            Self::Jump => frame.map.is_some() && frame.view_len > 1,
            Self::NextPanel => frame.buttons.next_panel,
            Self::PreviousPanel => frame.buttons.previous_panel,
            Self::Period | Self::Quit => true,
        }
    }
}

fn enabled_steps(frame: &Frame) -> Vec<Step> {
    Step::ALL
        .iter()
        .copied()
        .filter(|s| s.enabled(frame))
        .collect()
}

/// Terminal rendering of a [`Frame`].
pub struct FrameText<'a>(pub &'a Frame);

impl fmt::Display for FrameText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0;

        writeln!(f, "{}", frame.header.title)?;
        writeln!(f, "{}", frame.header.subtitle)?;
        writeln!(
            f,
            "Painel {}/{} | Período {} - {}",
            frame.panel_index + 1,
            frame.panel_count,
            frame.range.start.format(DISPLAY_DATE_FORMAT),
            frame.range.end.format(DISPLAY_DATE_FORMAT),
        )?;
        writeln!(f)?;

        if let Panel::Image { path } = &frame.panel {
            writeln!(f, "[imagem: {path}]")?;
        }

        if let Some(detail) = &frame.detail {
            writeln!(f, "Incidente {} de {}", detail.number, frame.view_len)?;
            if let Some(marker) = frame
                .map
                .as_ref()
                .and_then(|m| m.markers.iter().find(|m| m.highlighted))
            {
                writeln!(
                    f,
                    "Posição:          {:.5}, {:.5}",
                    marker.position.lat, marker.position.lng
                )?;
            }
            writeln!(f, "Natureza:         {}", detail.category)?;
            writeln!(f, "Município:        {}", detail.municipality)?;
            writeln!(f, "Data:             {}", detail.date)?;
            writeln!(f, "Intervalo:        {}", detail.interval)?;
            writeln!(f, "Causa presumida:  {}", detail.presumed_cause)?;
            writeln!(f, "Local imediato:   {}", detail.location)?;
            writeln!(f, "Síntese:          {}", detail.synopsis)?;
        }

        for warning in &frame.warnings {
            writeln!(f, "! {}", warning.message())?;
        }
        Ok(())
    }
}

fn parse_display_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DISPLAY_DATE_FORMAT).ok()
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate, dialoguer::Error> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .default(default.format(DISPLAY_DATE_FORMAT).to_string())
        .validate_with(|input: &String| {
            parse_display_date(input)
                .map(|_| ())
                .ok_or("use dd/mm/aaaa")
        })
        .interact_text()?;
    Ok(parse_display_date(&text).unwrap_or(default))
}

fn prompt_period(session: &SessionState) -> Result<Event, dialoguer::Error> {
    let presets = PeriodPreset::all();
    let labels: Vec<&str> = presets.iter().map(|p| p.label()).collect();
    let current = presets
        .iter()
        .position(|p| *p == session.selection.period.preset)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Período")
        .items(&labels)
        .default(current)
        .interact()?;

    let mut selection = session.selection.clone();
    selection.period.preset = presets[idx];
    if selection.period.preset == PeriodPreset::Manual {
        selection.period.manual_start = prompt_date("Início", selection.period.manual_start)?;
        selection.period.manual_end = prompt_date("Fim", selection.period.manual_end)?;
    }
    Ok(Event::Filters(selection))
}

fn prompt_jump(frame: &Frame) -> Result<Event, dialoguer::Error> {
    let number: usize = Input::new()
        .with_prompt(format!("Número do incidente (1-{})", frame.view_len))
        .default(frame.incident_index + 1)
        .interact_text()?;
    // 0 wraps to an out-of-range index and is rejected like any other.
    Ok(Event::MarkerClicked(
        MarkerId(number.wrapping_sub(1)).to_string(),
    ))
}

/// Runs the walkthrough until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(presenter: &Presenter, today: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = presenter.new_session(today);

    loop {
        let frame = presenter.frame(&mut session, today);
        println!();
        print!("{}", FrameText(&frame));
        println!();

        let steps = enabled_steps(&frame);
        let labels: Vec<&str> = steps.iter().map(|s| s.label()).collect();
        let idx = Select::new()
            .with_prompt("Ação")
            .items(&labels)
            .default(0)
            .interact()?;

        let event = match steps[idx] {
            Step::Next => Event::Navigate(NavAction::NextIncident),
            Step::Previous => Event::Navigate(NavAction::PreviousIncident),
            Step::NextPanel => Event::Navigate(NavAction::NextPanel),
            Step::PreviousPanel => Event::Navigate(NavAction::PreviousPanel),
            Step::Jump => prompt_jump(&frame)?,
            Step::Period => prompt_period(&session)?,
            Step::Quit => return Ok(()),
        };

        if let Err(e) = presenter.handle(&mut session, event, today) {
            println!("{e}");
        }
    }
}

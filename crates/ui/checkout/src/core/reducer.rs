//! Pure state transitions for the checkout form.
//!
//! `reduce` never performs I/O. Fetches leave as [`Effect::Async`] and return
//! later as `RegionsLoaded` / `DivisionsLoaded` / `GeographyFailed`.

use donation::{SubmitOutcome, submit};
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::NoticeMode;
use crate::core::effects::{Effect, TaskKind};
use crate::core::state::{CheckoutState, Notice, NoticeKind};

/// Work to start as soon as the form is shown: the UF list, plus the city
/// list for the initial "none selected" UF.
pub fn startup(state: &CheckoutState) -> Vec<Effect> {
    vec![
        Effect::async_task(TaskKind::FetchRegions),
        Effect::async_task(TaskKind::FetchDivisions(state.selector.initial_request())),
    ]
}

pub fn reduce(state: &mut CheckoutState, action: &Action) -> Vec<Effect> {
    match action {
        Action::Quit => {
            state.quit_requested = true;
        }
        Action::EditField { path, value } => {
            if let Err(e) = state.registry.edit_field(path, value) {
                warn!("edit ignored: {e}");
            }
        }
        Action::SelectRegion(region) => {
            let request = state.selector.select_region(region.clone());
            if let Err(e) = state.registry.edit_field(&state.uf_path, region.as_str()) {
                warn!("region select not registered: {e}");
            }
            return vec![Effect::async_task(TaskKind::FetchDivisions(request))];
        }
        Action::SelectDivision(division) => {
            state.selector.select_division(division.clone());
            if let Err(e) = state.registry.edit_field(&state.city_path, division.as_str()) {
                warn!("division select not registered: {e}");
            }
        }
        Action::RegionsLoaded(regions) => {
            state.selector.set_regions(regions.clone());
        }
        Action::DivisionsLoaded { request, divisions } => {
            if !state.selector.apply_divisions(request, divisions.clone()) {
                debug!(uf = %request.region, "late division list dropped");
            }
        }
        Action::GeographyFailed { lookup, message } => {
            if state.network_notices == NoticeMode::Banner {
                state.notice = Some(Notice::error(format!(
                    "Não foi possível carregar {lookup}: {message}"
                )));
            }
        }
        Action::DismissNotice => {
            state.notice = None;
        }
        Action::Submit => {
            return match submit(&mut state.registry, &state.validator) {
                SubmitOutcome::Accepted(_) => {
                    state.notice = Some(Notice::success("Formulário enviado"));
                    vec![Effect::log("submission accepted")]
                }
                SubmitOutcome::Rejected(errors) => {
                    if matches!(state.notice, Some(Notice { kind: NoticeKind::Success, .. })) {
                        state.notice = None;
                    }
                    vec![Effect::log(format!(
                        "submission rejected with {} messages",
                        errors.len()
                    ))]
                }
            };
        }
        _ => {}
    }
    Vec::new()
}

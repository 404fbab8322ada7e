use netcalc_abstract::{Calculation, ReportConfig, Worksheet};
use tracing::{info, warn};

use crate::error::Result;
use crate::report::{Answer, ProblemOutcome, WorksheetReport};
use crate::{backoff, delay, multiplexing, routing, rtt, slowstart, stuffing, tcp, utilization};

/// Evaluate a single calculation.
pub fn solve(calculation: &Calculation, config: &ReportConfig) -> Result<Answer> {
    Ok(match calculation {
        Calculation::SlowStart(p) => Answer::Rounds(slowstart::simulate_params(p)?),
        Calculation::Multiplexing(p) => {
            let schedule = multiplexing::schedule_params(p)?;
            Answer::Completions(if config.sort_completions_by_turn {
                schedule.by_turn_order()
            } else {
                schedule.completions().to_vec()
            })
        }
        Calculation::QueuingDelay(p) => Answer::QueuingDelay(delay::queuing_delay(p)?),
        Calculation::CircuitTransmission(p) => {
            Answer::Milliseconds(delay::circuit_transmission_time_ms(p)?)
        }
        Calculation::CircuitUtilization(p) => {
            Answer::Percent(utilization::circuit_utilization_percent(p)?)
        }
        Calculation::Utilization(p) => Answer::Fraction(utilization::network_utilization(p)?),
        Calculation::EstRtt(p) => Answer::Milliseconds(rtt::estimated_rtt_params(p)?),
        Calculation::Backoff(p) => Answer::Backoff(backoff::backoff_range(p)?),
        Calculation::EffectiveDelay(p) => {
            Answer::Milliseconds(delay::rescale_effective_delay_ms(p)?)
        }
        Calculation::EndToEndDelay(p) => Answer::Milliseconds(delay::end_to_end_delay_ms(p)?),
        Calculation::VoipDelay(p) => Answer::Milliseconds(delay::voip_delay_ms(p)?),
        Calculation::SegmentNumbers(p) => Answer::Segments(tcp::segment_numbers(p)?),
        Calculation::FairBandwidth(p) => Answer::Bandwidth(tcp::fair_bandwidth(p)?),
        Calculation::ByteStuffing(p) => Answer::Stuffed(stuffing::stuff_bytes(p)?),
        Calculation::PrefixRoute(p) => Answer::Route(routing::route(p)?),
    })
}

/// Solve every problem on the sheet. A failing problem is recorded in the
/// report and does not stop the rest.
pub fn run_worksheet(sheet: &Worksheet, mut config: ReportConfig) -> WorksheetReport {
    sheet.config.apply_to(&mut config);

    info!("Running worksheet: {}", sheet.name);
    if !sheet.description.is_empty() {
        info!("Description: {}", sheet.description);
    }

    let mut outcomes = Vec::with_capacity(sheet.problems.len());
    let (mut solved, mut failed) = (0, 0);

    for problem in &sheet.problems {
        let kind = problem.calculation.kind().to_string();
        match solve(&problem.calculation, &config) {
            Ok(answer) => {
                info!("[{}] {}", problem.label, answer.summary(config.precision));
                solved += 1;
                outcomes.push(ProblemOutcome {
                    label: problem.label.clone(),
                    kind,
                    answer: Some(answer),
                    error: None,
                });
            }
            Err(e) => {
                warn!("[{}] {} failed: {}", problem.label, kind, e);
                failed += 1;
                outcomes.push(ProblemOutcome {
                    label: problem.label.clone(),
                    kind,
                    answer: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    info!("{} solved, {} failed", solved, failed);
    WorksheetReport {
        name: sheet.name.clone(),
        description: sheet.description.clone(),
        config,
        outcomes,
        solved,
        failed,
    }
}

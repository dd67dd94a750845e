use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::{SessionFilter, list_sessions, total_cost, total_seconds};
use crate::errors::{AppError, AppResult};
use crate::utils::time::{format_duration, parse_date};
use chrono::Local;

use super::open_db;

/// today | week | month | YYYY-MM-DD | FROM:TO
fn parse_period(period: &str) -> AppResult<SessionFilter> {
    let today = Local::now().date_naive();
    match period {
        "today" => Ok(SessionFilter::day(today)),
        "week" => Ok(SessionFilter::week(today)),
        "month" => Ok(SessionFilter::month(today)),
        other => {
            if let Some((from_raw, to_raw)) = other.split_once(':') {
                let from = parse_date(from_raw.trim())
                    .ok_or_else(|| AppError::InvalidDate(from_raw.to_string()))?;
                let to = parse_date(to_raw.trim())
                    .ok_or_else(|| AppError::InvalidDate(to_raw.to_string()))?;
                if from > to {
                    return Err(AppError::InvalidPeriod(other.to_string()));
                }
                Ok(SessionFilter::range(from, to))
            } else {
                let day =
                    parse_date(other).ok_or_else(|| AppError::InvalidPeriod(other.to_string()))?;
                Ok(SessionFilter::day(day))
            }
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, project } = cmd {
        let db = open_db(cfg)?;

        let mut filter = parse_period(period)?;
        if let Some(pid) = project {
            filter = filter.for_project(*pid);
        }

        let views = list_sessions(&db.conn, &filter)?;
        for v in &views {
            let end = match v.session.end_time {
                Some(e) => e.format("%H:%M:%S").to_string(),
                None => "running".to_string(),
            };
            let paid = if v.session.paid { " [paid]" } else { "" };
            println!(
                "{:>5}  {}  {:<8} {:<24} {:<28} {:>9}  {:>8.2}{}",
                v.session.id,
                v.session.start_time.format("%Y-%m-%d %H:%M:%S"),
                end,
                v.project_name.as_deref().unwrap_or("-"),
                v.session.description,
                format_duration(v.session.duration),
                v.cost,
                paid,
            );
        }

        let seconds = total_seconds(&db.conn, &filter)?;
        let cost = total_cost(&db.conn, &filter)?;
        println!(
            "\nTotal: {} sessions, {} tracked, {:.2} billable",
            views.len(),
            format_duration(seconds),
            cost
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbolic_and_explicit_periods() {
        assert!(parse_period("today").is_ok());
        assert!(parse_period("week").is_ok());
        assert!(parse_period("month").is_ok());

        let day = parse_period("2025-03-09").unwrap();
        assert_eq!(day.from, day.to);

        let range = parse_period("2025-03-01:2025-03-09").unwrap();
        assert!(range.from < range.to);

        assert!(parse_period("2025-03-09:2025-03-01").is_err());
        assert!(parse_period("notadate").is_err());
    }
}

//! Conformance tool: calendar arithmetic
//!
//! Reads one ISO date (`YYYY-MM-DD`) per line and writes
//! `<day_of_year> <day_of_week> <unix_timestamp>` per line, `ERR` for
//! dates that do not exist.

use std::io::BufRead;

use lockward::calendar::CalendarDate;

fn main() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_date(line) {
            Some(date) => {
                let timestamp = date
                    .to_timestamp(0)
                    .expect("midnight is a valid time of day");
                println!("{:03} {} {:10}", date.day_of_year(), date.day_of_week(), timestamp);
            }
            None => println!("ERR"),
        }
    }
    Ok(())
}

fn parse_date(text: &str) -> Option<CalendarDate> {
    let mut parts = text.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    CalendarDate::new(year, month, day).ok()
}

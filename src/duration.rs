const MINUTES_PER_DAY: i64 = 24 * 60;
const END_OF_DAY: &str = "end";

/// Hours in `"HH:MM - HH:MM"` or `"HH:MM - End"`, one decimal. Anything that
/// does not parse counts as zero; an end before the start crosses midnight.
pub fn block_hours(time_range: &str) -> f64 {
    let parts = time_range.split('-').map(str::trim).collect::<Vec<_>>();
    let [start, end] = parts.as_slice() else {
        return 0.0;
    };

    let (Some(start), Some(end)) = (minutes_since_midnight(start), minutes_since_midnight(end))
    else {
        return 0.0;
    };

    let mut minutes = end - start;
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }

    round_tenths(minutes as f64 / 60.0)
}

pub fn round_tenths(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

fn minutes_since_midnight(token: &str) -> Option<i64> {
    if token.eq_ignore_ascii_case(END_OF_DAY) {
        return Some(MINUTES_PER_DAY);
    }

    let (hours, minutes) = token.split_once(':')?;
    let hours = hours.trim().parse::<i64>().ok()?;
    let minutes = minutes.trim().parse::<i64>().ok()?;
    if !(0..60).contains(&minutes) {
        return None;
    }

    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    (0..=MINUTES_PER_DAY).contains(&total).then_some(total)
}

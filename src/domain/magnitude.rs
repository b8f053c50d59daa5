//! Abbreviated display of large integers (`1.5M`, `12.3K`).

const UNITS: [(u64, &str); 3] = [
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

/// Renders `n` with the largest of K/M/B that does not exceed it, mantissa
/// rounded half-up to one decimal. Values below 1000 render as plain integers.
pub fn format_magnitude(n: u64) -> String {
    let Some(idx) = UNITS.iter().position(|&(unit, _)| n >= unit) else {
        return n.to_string();
    };

    let (unit, suffix) = UNITS[idx];
    let tenths = round_tenths(n, unit);

    // 999_950 rounds to 1000.0K; promote to the next unit up when there is one.
    if tenths >= 10_000 && idx > 0 {
        let (bigger, bigger_suffix) = UNITS[idx - 1];
        return render(round_tenths(n, bigger), bigger_suffix);
    }

    render(tenths, suffix)
}

fn round_tenths(n: u64, unit: u64) -> u128 {
    let n = n as u128;
    let unit = unit as u128;
    (n * 10 + unit / 2) / unit
}

fn render(tenths: u128, suffix: &str) -> String {
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
}

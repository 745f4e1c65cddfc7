// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use colored::*;
use kdam::{Bar, tqdm};

/// A basic progress bar for tracking iterations
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// A description prefixed with a standardized timestamp
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%d").to_string();
    let hms = time.format("%H:%M:%S").to_string();

    format!(
        "{} {} | {} {} {} {} {}",
        "[".bold(),
        ymd,
        hms,
        "|".bold(),
        "veval".truecolor(219, 112, 64).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Format numbers with thousands separators
///
/// # Examples
///
/// ```
/// use veval_core::ut::track::thousands_format;
///
/// assert_eq!(thousands_format(999), "999");
/// assert_eq!(thousands_format(1234), "1,234");
/// assert_eq!(thousands_format(1234567), "1,234,567");
/// ```
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    let digits: Vec<char> = number.chars().collect();

    if digits.len() < 4 || !digits.iter().all(|c| c.is_ascii_digit()) {
        return number;
    }

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*digit);
    }

    formatted
}

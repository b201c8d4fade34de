//! Plain-text rendering of reports.

use std::io::{self, Write};

use wizard_core::{
    DailyForecast, ForecastView, Location, MediaCatalog, Units, WeatherSample,
    media::icon_url,
    model::CurrentReport,
};

const FOOTER: &str = "🌍 Powered by OpenWeatherMap & curated weather videos 🎬";
const RULE: &str = "---";

pub fn current(
    out: &mut impl Write,
    location: &Location,
    report: &CurrentReport,
    units: Units,
    media: &MediaCatalog,
) -> io::Result<()> {
    let entry = media.lookup(&report.sample.condition);

    writeln!(out, "{} Weather in {}", entry.icon, title_case(&location.label))?;
    writeln!(out, "📍 Reported for: {}", report.location_name)?;
    write_details(out, &report.sample, units)?;
    writeln!(out, "🎥 Weather vibes: {}", entry.autoplay_url())?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{FOOTER}")
}

pub fn forecast(
    out: &mut impl Write,
    location: &Location,
    view: &ForecastView,
    units: Units,
    media: &MediaCatalog,
) -> io::Result<()> {
    if let Some(today) = &view.today {
        let entry = media.lookup(&today.sample.condition);
        writeln!(out, "🌞 Today's Weather in {}", title_case(&location.label))?;
        writeln!(out, "{} Weather Today", entry.icon)?;
        write_details(out, &today.sample, units)?;
        writeln!(out, "🎥 Weather vibes: {}", entry.autoplay_url())?;
        writeln!(out, "{RULE}")?;
    }

    let count = view.next_days.len();
    let noun = if count == 1 { "Day" } else { "Days" };
    writeln!(out, "📆 Forecast for the Next {count} {noun}")?;
    for day in &view.next_days {
        write_day(out, day, units, media)?;
    }

    writeln!(out, "{FOOTER}")
}

fn write_day(
    out: &mut impl Write,
    day: &DailyForecast,
    units: Units,
    media: &MediaCatalog,
) -> io::Result<()> {
    let entry = media.lookup(&day.sample.condition);
    writeln!(out, "{} {}", entry.icon, day.date.format("%A, %d %B %Y"))?;
    write_details(out, &day.sample, units)?;
    writeln!(out, "🖼️ {}", icon_url(&day.sample.icon_code))?;
    writeln!(out, "{RULE}")
}

fn write_details(out: &mut impl Write, sample: &WeatherSample, units: Units) -> io::Result<()> {
    let t = units.temperature_symbol();
    writeln!(out, "Condition: {}", capitalize(&sample.description))?;
    writeln!(
        out,
        "🌡️ Temperature: {}{t} (Feels like {}{t})",
        sample.temperature, sample.feels_like
    )?;
    writeln!(out, "💧 Humidity: {}%", sample.humidity)?;
    writeln!(out, "💨 Wind Speed: {} {}", sample.wind_speed, units.speed_symbol())
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Every word starts upper-case.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

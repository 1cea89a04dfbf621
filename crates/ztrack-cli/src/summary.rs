use std::collections::BTreeMap;
use std::path::Path;

use console::Style;
use ztrack_core::frame::FrameSource;
use ztrack_core::params::{ParamValue, ParameterSet};
use ztrack_core::tracking::{PoseTable, Tracker, TrackerKind};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

fn format_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(v) => (if *v { "yes" } else { "no" }).to_string(),
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Float(v) => format!("{v}"),
        ParamValue::Text(v) => v.clone(),
        ParamValue::Point([x, y]) => format!("({x}, {y})"),
        ParamValue::Rect([x, y, w, h]) => format!("{w}x{h} at ({x}, {y})"),
        ParamValue::Unset => "unset".to_string(),
    }
}

fn print_parameters(s: &Styles, params: &ParameterSet) {
    for (name, variable) in params.iter() {
        let range = match (variable.minimum(), variable.maximum()) {
            (Some(lo), Some(hi)) => format!("  [{lo}, {hi}]"),
            _ => String::new(),
        };
        println!(
            "    {:<24}{}{}",
            s.label.apply_to(name),
            s.value.apply_to(format_value(&variable.value())),
            s.label.apply_to(range)
        );
    }
}

pub fn print_run_summary(
    file: &Path,
    video: &dyn FrameSource,
    trackers: &[(String, Box<dyn Tracker>)],
) {
    let s = Styles::new();
    print_title(&s, "ztrack");

    println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(file.display()));
    println!("  {:<14}{}", s.label.apply_to("Frames"), s.value.apply_to(video.len()));
    match video.fps() {
        Some(fps) => println!(
            "  {:<14}{}",
            s.label.apply_to("Frame rate"),
            s.value.apply_to(format!("{fps:.2} fps"))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Frame rate"),
            s.disabled.apply_to("unknown")
        ),
    }
    println!();

    for (group, tracker) in trackers {
        println!(
            "  {:<14}{}",
            s.header.apply_to(group),
            s.method.apply_to(tracker.display_name())
        );
        match tracker.roi() {
            Some(roi) => println!(
                "    {:<24}{}",
                s.label.apply_to("roi"),
                s.value.apply_to(format!("{}x{} at ({}, {})", roi.width, roi.height, roi.x, roi.y))
            ),
            None => println!(
                "    {:<24}{}",
                s.label.apply_to("roi"),
                s.disabled.apply_to("full frame")
            ),
        }
        print_parameters(&s, tracker.parameters());
        println!();
    }
}

pub fn print_results(tables: &BTreeMap<String, PoseTable>) {
    let s = Styles::new();
    print_title(&s, "Results");

    for (group, table) in tables {
        let missing = table.missing_count();
        let missing = if missing == 0 {
            s.value.apply_to("none".to_string())
        } else {
            s.disabled.apply_to(format!("{missing} frames"))
        };
        println!("  {}", s.header.apply_to(group));
        println!("    {:<12}{}", s.label.apply_to("Frames"), s.value.apply_to(table.len()));
        println!("    {:<12}{}", s.label.apply_to("Columns"), s.value.apply_to(table.columns.len()));
        println!("    {:<12}{}", s.label.apply_to("Missing"), missing);
    }
}

pub fn print_tracker_catalog(trackers: &[(TrackerKind, Box<dyn Tracker>)]) {
    let s = Styles::new();
    print_title(&s, "Trackers");

    for (kind, tracker) in trackers {
        println!(
            "  {} {} {}",
            s.method.apply_to(kind.name()),
            s.label.apply_to(format!("({})", kind.group())),
            s.value.apply_to(kind.display_name())
        );
        if tracker.parameters().is_empty() {
            println!("    {}", s.disabled.apply_to("no parameters"));
        } else {
            print_parameters(&s, tracker.parameters());
        }
        println!();
    }
}

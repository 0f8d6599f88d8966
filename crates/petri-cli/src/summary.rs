use console::Style;
use petri_core::pipeline::config::BatchConfig;
use petri_core::pipeline::BatchSummary;
use petri_core::plan::ChannelRole;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warn: Style::new().yellow(),
        }
    }
}

pub fn print_batch_summary(config: &BatchConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Petri Preprocessing"));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Inputs"),
        s.value.apply_to(config.inputs.len())
    );
    match &config.output_dir {
        Some(dir) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(dir.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.label.apply_to("next to each input")
        ),
    }

    for ch in &config.plan.channels {
        let role = match ch.role {
            ChannelRole::Brightfield => s.method.apply_to("Brightfield"),
            ChannelRole::Fluorescence => s.method.apply_to("Fluorescence"),
        };
        let flat = config
            .plan
            .flat_field_for(ch.index)
            .and_then(|ff| ff.apply.then(|| ff.reference.clone()).flatten())
            .map(|p| format!(" flat-field {}", p.display()))
            .unwrap_or_default();
        if ch.process {
            println!(
                "  {:<14}{}{}",
                s.label.apply_to(format!("Channel {}", ch.index + 1)),
                role,
                s.label.apply_to(flat)
            );
        } else {
            println!(
                "  {:<14}{}",
                s.label.apply_to(format!("Channel {}", ch.index + 1)),
                s.disabled.apply_to("unprocessed")
            );
        }
    }

    println!(
        "  {:<14}{}",
        s.label.apply_to("Median"),
        s.value.apply_to(format!("radius {} px", config.median_radius))
    );
    match config.gaussian_sigma {
        Some(sigma) => println!(
            "  {:<14}{}",
            s.label.apply_to("Gaussian"),
            s.value.apply_to(format!("sigma {sigma}"))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Gaussian"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

pub fn print_batch_result(summary: &BatchSummary) {
    let s = Styles::new();

    for unit in &summary.processed {
        for output in &unit.outputs {
            println!("  {} {}", s.method.apply_to("wrote"), s.path.apply_to(output.display()));
        }
    }
    for skipped in &summary.skipped {
        println!(
            "  {} {} ({})",
            s.warn.apply_to("skipped"),
            skipped.name,
            s.label.apply_to(&skipped.reason)
        );
    }

    println!();
    println!(
        "  {} unit(s) processed, {} skipped",
        s.value.apply_to(summary.processed.len()),
        if summary.skipped.is_empty() {
            s.value.apply_to(summary.skipped.len())
        } else {
            s.warn.apply_to(summary.skipped.len())
        }
    );
}

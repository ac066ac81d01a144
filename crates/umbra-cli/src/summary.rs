use console::Style;
use umbra_core::detection::CircleOrigin;
use umbra_core::pipeline::config::AnalysisConfig;
use umbra_core::pipeline::AnalysisOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
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
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

fn enabled(s: &Styles, on: bool) -> String {
    if on {
        s.method.apply_to("yes").to_string()
    } else {
        s.disabled.apply_to("no").to_string()
    }
}

pub fn print_analysis_summary(config: &AnalysisConfig) {
    let s = Styles::new();
    let hough = &config.tracking.hough;
    let d = config.tracking.default_circle;

    println!();
    println!("  {}", s.title.apply_to("Umbra Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sampling"),
        s.value.apply_to(format!("{} fps", config.sample_fps))
    );
    if let Some(rate) = config.source_frame_rate {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Source rate"),
            s.value.apply_to(format!("{rate} fps"))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Tracking"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Pick"),
        s.method.apply_to(config.tracking.pick)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(format!(
            "canny {} / acc {}",
            hough.canny_threshold, hough.accumulator_threshold
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Min dist"),
        s.value.apply_to(format!("{} px", hough.min_dist))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Default"),
        s.value.apply_to(format!("({}, {}) r={}", d.x, d.y, d.radius))
    );
    println!();

    let series = &config.series;
    if series.needs_channels() {
        println!("  {}", s.header.apply_to("Channels"));
        println!("    {:<12}{}", s.label.apply_to("Mean RGB"), enabled(&s, series.rgb));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Rows/Cols"),
            enabled(&s, series.rows || series.cols)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Compress"),
            s.value.apply_to(format!(
                "{} ({})",
                config.channels.compress, config.channels.strategy
            ))
        );
        println!();
    }

    if series.needs_polar() {
        let polar = &config.polar;
        println!("  {}", s.header.apply_to("Polar"));
        let sweep = match polar.max_radius {
            Some(r) => format!("{r} px"),
            None => "first disk radius + margin".to_string(),
        };
        println!("    {:<12}{}", s.label.apply_to("Sweep"), s.value.apply_to(sweep));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Compress"),
            s.value.apply_to(format!(
                "{} deg / {} px ({})",
                polar.angular_compress, polar.radial_compress, polar.strategy
            ))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Boundary"),
            s.method.apply_to(polar.boundary)
        );
        println!();
    }

    if !series.needs_channels() && !series.needs_polar() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Profiles"),
            s.disabled.apply_to("disabled")
        );
        println!();
    }
}

pub fn print_tracking_report(output: &AnalysisOutput) {
    let s = Styles::new();
    let stats = output.stats;

    println!();
    println!("  {}", s.header.apply_to("Tracking"));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(stats.frames())
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Detected"),
        s.value.apply_to(stats.detected)
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Carried forward"),
        s.value.apply_to(stats.carried_forward)
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Defaulted"),
        s.value.apply_to(stats.defaulted)
    );

    if stats.detected == 0 && stats.frames() > 0 {
        println!();
        println!(
            "  {}",
            s.warning
                .apply_to("No disk was detected; every estimate is the default circle.")
        );
    } else if let Some(last) = output
        .tracks
        .iter()
        .rev()
        .find(|t| t.origin == CircleOrigin::Detected)
    {
        let e = last.estimate;
        println!(
            "    {:<16}{}",
            s.label.apply_to("Last detection"),
            s.value.apply_to(format!("({}, {}) r={}", e.x, e.y, e.radius))
        );
    }

    if !output.written.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Written"));
        for path in &output.written {
            println!("    {}", s.path.apply_to(path.display()));
        }
    }
    println!();
}

use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot AEO/OEI climb gradient against gross weight from a sweep CSV"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/gradient.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// All-engines minimum drawn as a reference line (ft/nm)
    #[arg(long, default_value_t = 300.0)]
    aeo_min: f64,
    /// One-engine-inoperative minimum drawn as a reference line (ft/nm)
    #[arg(long, default_value_t = 200.0)]
    oei_min: f64,
}

#[derive(Debug, Clone)]
struct Sample {
    weight_lbf: f64,
    aeo_gradient: f64,
    oei_gradient: f64,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let mut samples = read_samples(&cli.input)?;
    if samples.is_empty() {
        return Err(anyhow::anyhow!("No usable rows in the provided CSV"));
    }
    samples.sort_by(|a, b| a.weight_lbf.total_cmp(&b.weight_lbf));
    tracing::debug!(rows = samples.len(), "read sweep samples");

    let w_min = samples[0].weight_lbf;
    let w_max = samples[samples.len() - 1].weight_lbf;
    let (w_lo, w_hi) = if w_max > w_min {
        (w_min, w_max)
    } else {
        (w_min - 1_000.0, w_max + 1_000.0)
    };

    let mut g_lo = cli.oei_min.min(cli.aeo_min);
    let mut g_hi = cli.oei_min.max(cli.aeo_min);
    for s in &samples {
        g_lo = g_lo.min(s.aeo_gradient).min(s.oei_gradient);
        g_hi = g_hi.max(s.aeo_gradient).max(s.oei_gradient);
    }
    let pad = ((g_hi - g_lo) * 0.05).max(10.0);
    let (g_lo, g_hi) = (g_lo - pad, g_hi + pad);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Takeoff climb gradient".to_string(), caption_font)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(w_lo..w_hi, g_lo..g_hi)?;

    chart
        .configure_mesh()
        .x_desc("Gross weight (lbf)")
        .y_desc("Climb gradient (ft/nm)")
        .label_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|w| format!("{w:.0}"))
        .y_label_formatter(&|g| format!("{g:.0}"))
        .draw()?;

    let aeo_color = RGBColor(30, 90, 200);
    let oei_color = RGBColor(210, 100, 20);

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.weight_lbf, s.aeo_gradient)),
            ShapeStyle::from(&aeo_color).stroke_width(2),
        ))?
        .label("AEO")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&aeo_color))
        });
    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.weight_lbf, s.oei_gradient)),
            ShapeStyle::from(&oei_color).stroke_width(2),
        ))?
        .label("OEI")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&oei_color))
        });

    for (level, color) in [(cli.aeo_min, aeo_color), (cli.oei_min, oei_color)] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(w_lo, level), (w_hi, level)],
            ShapeStyle::from(&color.mix(0.5)).stroke_width(1),
        )))?;
    }

    chart
        .configure_series_labels()
        .label_font(label_font)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_samples(path: &str) -> anyhow::Result<Vec<Sample>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("CSV missing '{name}' column"))
    };
    let weight_idx = column("weight_lbf")?;
    let aeo_idx = column("aeo_gradient_ft_nm")?;
    let oei_idx = column("oei_gradient_ft_nm")?;

    let mut samples = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let field = |idx: usize| r.get(idx).unwrap_or("").parse::<f64>().unwrap_or(f64::NAN);
        let sample = Sample {
            weight_lbf: field(weight_idx),
            aeo_gradient: field(aeo_idx),
            oei_gradient: field(oei_idx),
        };
        if sample.weight_lbf.is_finite()
            && sample.aeo_gradient.is_finite()
            && sample.oei_gradient.is_finite()
        {
            samples.push(sample);
        }
    }
    Ok(samples)
}

use banana_core::consts::MM3_PER_ML;
use banana_core::pipeline::{PipelineArtifacts, PipelineConfig};
use banana_core::report::RiskLevel;
use banana_core::segment::SegmentationStats;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    path: Style,
    warn: Style,
    ok: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
            warn: Style::new().yellow().bold(),
            ok: Style::new().green(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();
    let seg = &config.segmentation;

    println!();
    println!("  {}", s.title.apply_to("Banana Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
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
        s.label.apply_to("Case"),
        s.value.apply_to(config.resolved_case_name())
    );
    println!();

    println!("  {}", s.header.apply_to("Segmentation"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("HU window"),
        s.value.apply_to(seg.hu_window)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Soft gate"),
        s.value.apply_to(seg.soft_mask_hu)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Top percent"),
        s.value.apply_to(format!("{:.0}%", seg.top_percent * 100.0))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Z smoothing"),
        s.value.apply_to(format!("{} slice(s)", seg.z_smooth_k))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min area"),
        s.value.apply_to(format!("{} px", seg.min_area))
    );
    println!();
}

pub fn print_segmentation_stats(stats: &SegmentationStats, voxel_volume_mm3: f64) {
    let s = Styles::new();
    let volume_ml = stats.voxels_clean as f64 * voxel_volume_mm3 / MM3_PER_ML;

    println!();
    println!("  {}", s.header.apply_to("Segmentation"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Shape"),
        s.value.apply_to(format!(
            "{} x {} x {}",
            stats.shape[0], stats.shape[1], stats.shape[2]
        ))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(format!("{:.4}", stats.threshold))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Raw voxels"),
        s.value.apply_to(stats.voxels_raw)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Clean voxels"),
        s.value.apply_to(stats.voxels_clean)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Clean ratio"),
        s.value.apply_to(format!("{:.4}%", stats.ratio_clean * 100.0))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Volume"),
        s.value.apply_to(format!("{volume_ml:.2} ml"))
    );
}

pub fn print_artifacts(artifacts: &PipelineArtifacts) {
    let s = Styles::new();
    let a = &artifacts.assessment;

    print_segmentation_stats(&artifacts.stats, a.voxel_volume_mm3);
    println!();

    println!("  {}", s.header.apply_to("Assessment"));
    let risk_style = match a.risk {
        RiskLevel::High | RiskLevel::Moderate => &s.warn,
        RiskLevel::Low | RiskLevel::VeryLow => &s.ok,
    };
    println!(
        "    {:<14}{}",
        s.label.apply_to("Risk tier"),
        risk_style.apply_to(format!("{} ({:.0}%)", a.risk, a.risk_pct))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!(
            "{} (~{:.1} cm across)",
            a.size.label, a.size.diameter_cm
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Artifacts"));
    let mut paths = vec![
        ("Image", &artifacts.image),
        ("Mask", &artifacts.mask),
        ("Overlay", &artifacts.overlay),
    ];
    if let Some(ref scoremap) = artifacts.scoremap {
        paths.push(("Score map", scoremap));
    }
    paths.push(("Report", &artifacts.report_pro));
    paths.push(("Summary", &artifacts.report_easy));
    paths.push(("JSON", &artifacts.report_json));
    paths.push(("PDF", &artifacts.report_pdf));
    for (label, path) in paths {
        println!(
            "    {:<14}{}",
            s.label.apply_to(label),
            s.path.apply_to(path.display())
        );
    }
    println!();
}

//! Standalone SVG line plots of correlation against distance.

use crate::pipeline::{LookupReport, RadialReport};

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 440.0;
const MARGIN: f64 = 60.0;
const Y_MAX: f64 = 0.9;

pub fn lookup_svg(report: &LookupReport) -> String {
    let s = &report.series;
    line_plot_svg(
        &format!("6x6 Heisenberg J1-J2 Model Ground State (J2/J1 = {:.2})", report.ratio),
        &s.distances,
        &s.values,
        &s.labels,
    )
}

pub fn radial_svg(report: &RadialReport) -> String {
    let c = report.couplings;
    let xs: Vec<f64> = report.profile.shells.iter().map(|s| s.distance).collect();
    let ys: Vec<f64> = report.profile.shells.iter().map(|s| s.mean).collect();
    let labels: Vec<String> = xs.iter().map(|r| format!("{:.3}", r)).collect();
    line_plot_svg(
        &format!("Radial C(r), J1 = {}, J2 = {}, J3 = {}", c.j1, c.j2, c.j3),
        &xs,
        &ys,
        &labels,
    )
}

/// Markers joined by a line, each annotated with its label, a dashed zero
/// line and a dotted grid. The y-range is `[min(y) - 0.1, 0.9]`.
pub fn line_plot_svg(title: &str, xs: &[f64], ys: &[f64], labels: &[String]) -> String {
    let chart_w = WIDTH - 2.0 * MARGIN;
    let chart_h = HEIGHT - 2.0 * MARGIN;

    let x_max = xs.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.05;
    let y_min = ys.iter().copied().fold(f64::INFINITY, f64::min) - 0.1;
    let y_min = if y_min < Y_MAX { y_min } else { Y_MAX - 1.0 };

    let px = |x: f64| MARGIN + x / x_max * chart_w;
    let py = |y: f64| MARGIN + (Y_MAX - y) / (Y_MAX - y_min) * chart_h;

    let mut grid = String::new();
    for i in 0..=4 {
        let x = x_max * i as f64 / 4.0;
        let y = y_min + (Y_MAX - y_min) * i as f64 / 4.0;
        grid.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#d1d5db" stroke-width="1" stroke-dasharray="1,3"/>
  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11" fill="#6b7280">{:.2}</text>
  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#d1d5db" stroke-width="1" stroke-dasharray="1,3"/>
  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#6b7280">{:.2}</text>
  "##,
            px(x), MARGIN, px(x), HEIGHT - MARGIN,
            px(x), HEIGHT - MARGIN + 18.0, x,
            MARGIN, py(y), WIDTH - MARGIN, py(y),
            MARGIN - 6.0, py(y) + 4.0, y,
        ));
    }

    let path: Vec<String> = xs
        .iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (x, y))| {
            format!("{}{:.1},{:.1}", if i == 0 { "M" } else { "L" }, px(*x), py(*y))
        })
        .collect();

    let mut markers = String::new();
    for ((x, y), label) in xs.iter().zip(ys).zip(labels) {
        markers.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#2563eb"/>
  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10" fill="#374151">{}</text>
  "##,
            px(*x), py(*y),
            px(*x), py(*y) - 9.0, escape(label),
        ));
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" style="background:white">
  <text x="{}" y="28" text-anchor="middle" font-size="15" font-weight="600" fill="#111827">{}</text>
  {}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#374151" stroke-width="1.5"/>
  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#374151" stroke-width="1.5"/>
  <line x1="{}" y1="{:.1}" x2="{}" y2="{:.1}" stroke="#dc2626" stroke-width="1" stroke-dasharray="6,4"/>
  <path d="{}" fill="none" stroke="#2563eb" stroke-width="1.5"/>
  {}<text x="{}" y="{}" text-anchor="middle" font-size="12" fill="#374151">Distance r</text>
  <text x="18" y="{}" text-anchor="middle" font-size="12" fill="#374151" transform="rotate(-90, 18, {})">C(r)</text>
</svg>
"##,
        WIDTH, HEIGHT,
        WIDTH / 2.0, escape(title),
        grid,
        MARGIN, HEIGHT - MARGIN, WIDTH - MARGIN, HEIGHT - MARGIN,
        MARGIN, MARGIN, MARGIN, HEIGHT - MARGIN,
        MARGIN, py(0.0), WIDTH - MARGIN, py(0.0),
        path.join(" "),
        markers,
        WIDTH / 2.0, HEIGHT - 14.0,
        HEIGHT / 2.0, HEIGHT / 2.0,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_and_labels_are_drawn() {
        let labels = vec!["(0,0)".to_string(), "(1,0)".to_string()];
        let svg = line_plot_svg("t", &[0.0, 1.0], &[0.75, -0.3], &labels);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">(1,0)</text>"));
        assert!(svg.contains("stroke=\"#dc2626\""));
        assert!(svg.contains("Distance r"));
    }

    #[test]
    fn empty_series_still_renders_axes() {
        let svg = line_plot_svg("empty", &[], &[], &[]);
        assert!(svg.contains("</svg>"));
        assert!(!svg.contains("<circle"));
    }
}

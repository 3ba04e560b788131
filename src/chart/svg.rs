use std::fmt::Write as _;

use crate::chart::scene::{ChartScene, TextAnchor, TextRun};

/// Serialize a scene as a standalone SVG document sized to the scene canvas.
pub fn scene_to_svg(scene: &ChartScene) -> String {
    let w = scene.canvas.width;
    let h = scene.canvas.height;
    let fg = scene.foreground.to_hex();
    let plot = scene.plot_area;

    let mut out = String::with_capacity(1024 + scene.bars.len() * 512);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        scene.background.to_hex()
    );

    out.push_str("<g>\n");
    for bar in &scene.bars {
        let r = bar.rect;
        let _ = writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            r.x0,
            r.y0,
            r.width().max(0.0),
            r.height(),
            bar.fill.to_hex()
        );
    }
    out.push_str("</g>\n");

    let _ = writeln!(
        out,
        r#"<g fill="none" stroke="{fg}" stroke-width="1"><path d="M{:.2} {:.2} H{:.2} V{:.2} H{:.2} Z"/>"#,
        plot.x0, plot.y0, plot.x1, plot.y1, plot.x0
    );
    for tick in &scene.ticks {
        let _ = writeln!(
            out,
            r#"<path d="M{:.2} {:.2} V{:.2}"/>"#,
            tick.x,
            plot.y1,
            plot.y1 + 4.0
        );
    }
    out.push_str("</g>\n");

    let _ = writeln!(
        out,
        r#"<g font-family="{}" fill="{fg}">"#,
        escape_xml(&scene.font_family)
    );
    push_text(&mut out, &scene.title);
    push_text(&mut out, &scene.x_label);
    push_text(&mut out, &scene.y_label);
    for tick in &scene.ticks {
        push_text(&mut out, &tick.label);
    }
    for bar in &scene.bars {
        push_text(&mut out, &bar.name_label);
        push_text(&mut out, &bar.value_label);
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn push_text(out: &mut String, run: &TextRun) {
    let anchor = match run.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let (x, y) = (run.origin.x, run.origin.y);
    let _ = write!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" font-size="{:.2}" text-anchor="{anchor}""#,
        run.size_px
    );
    if run.rotate_deg != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({:.2} {x:.2} {y:.2})""#,
            run.rotate_deg
        );
    }
    let _ = writeln!(out, ">{}</text>", escape_xml(&run.text));
}

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/chart/svg.rs"]
mod tests;

//! Report Export Module
//! Writes the report as a self-contained HTML document, as one PNG per
//! chart and as JSON of every derived table.

use crate::charts::{layout, RenderError, StaticChartRenderer};
use crate::config::ReportSettings;
use crate::report::{ChartKind, DerivedTable, Report, View};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render '{title}': {source}")]
    Render {
        title: String,
        #[source]
        source: RenderError,
    },
    #[error("Failed to serialize views: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to open {}", .0.display())]
    Open(PathBuf),
}

/// Turns a view into inline SVG markup.
pub trait ChartRenderer {
    fn svg(&self, view: &View, size: (u32, u32)) -> Result<String, RenderError>;
}

/// SVG through plotters.
pub struct PlottersSvg;

impl ChartRenderer for PlottersSvg {
    fn svg(&self, view: &View, size: (u32, u32)) -> Result<String, RenderError> {
        StaticChartRenderer::render_svg(view, size)
    }
}

#[derive(Serialize)]
struct ViewsDocument<'a> {
    title: &'a str,
    source_fingerprint: &'a str,
    views: Vec<NamedTable<'a>>,
}

#[derive(Serialize)]
struct NamedTable<'a> {
    chapter: &'a str,
    title: &'a str,
    #[serde(flatten)]
    table: &'a DerivedTable,
}

pub struct ReportExporter;

impl ReportExporter {
    /// Build the full HTML document. Table views become HTML tables, every
    /// other view is drawn by `renderer`.
    pub fn html_document(
        report: &Report,
        renderer: &dyn ChartRenderer,
        size: (u32, u32),
    ) -> Result<String, ExportError> {
        let mut body = String::new();

        for chapter in &report.chapters {
            let figure = match (&chapter.view.spec.kind, &chapter.view.table) {
                (ChartKind::Table, DerivedTable::TopDramas(rows)) => {
                    Self::html_table(chapter.view.spec.headers, &layout::table_cells(rows))
                }
                _ => renderer
                    .svg(&chapter.view, size)
                    .map_err(|source| ExportError::Render {
                        title: chapter.view.spec.title.to_string(),
                        source,
                    })?,
            };

            body.push_str(&format!(
                r#"<section class="chapter">
<h2>{heading}</h2>
<p>{lead}</p>
<figure>
<figcaption>{title}</figcaption>
{figure}
</figure>
"#,
                heading = escape_html(chapter.heading),
                lead = escape_html(chapter.lead),
                title = escape_html(chapter.view.spec.title),
                figure = figure,
            ));
            if let Some(caption) = chapter.caption {
                body.push_str(&format!("<p>{}</p>\n", escape_html(caption)));
            }
            body.push_str("</section>\n");
        }

        for block in &report.closing {
            body.push_str(&format!(
                "<p class=\"closing\">{}</p>\n",
                escape_html(block)
            ));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; line-height: 1.55; }}
h1 {{ text-align: center; }}
h2 {{ margin-top: 2.5rem; border-bottom: 1px solid #ddd; padding-bottom: .3rem; }}
figure {{ margin: 1rem 0; }}
figcaption {{ font-weight: 600; margin-bottom: .5rem; }}
svg {{ max-width: 100%; height: auto; }}
table {{ border-collapse: collapse; width: 100%; font-size: .9rem; }}
th {{ background: yellowgreen; text-align: left; }}
td {{ background: lightyellow; }}
th, td {{ border: 1px solid #fff; padding: .35rem .5rem; }}
.closing {{ font-style: italic; }}
footer {{ margin-top: 3rem; color: #888; font-size: .8rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{intro}</p>
{body}<footer>Source fingerprint {fingerprint}</footer>
</body>
</html>
"#,
            title = escape_html(report.title),
            intro = escape_html(report.introduction),
            body = body,
            fingerprint = escape_html(&report.source_fingerprint),
        ))
    }

    /// Write the HTML document into `dir`.
    pub fn write_html(
        report: &Report,
        renderer: &dyn ChartRenderer,
        dir: &Path,
        settings: &ReportSettings,
    ) -> Result<PathBuf, ExportError> {
        let html = Self::html_document(report, renderer, settings.chart_size)?;
        let path = dir.join(&settings.html_file_name);
        fs::write(&path, html)?;
        info!("Wrote HTML report to {}", path.display());
        Ok(path)
    }

    /// Every derived table as pretty JSON.
    pub fn views_json(report: &Report) -> Result<String, ExportError> {
        let document = ViewsDocument {
            title: report.title,
            source_fingerprint: &report.source_fingerprint,
            views: report
                .chapters
                .iter()
                .map(|c| NamedTable {
                    chapter: c.heading,
                    title: c.view.spec.title,
                    table: &c.view.table,
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn write_json(
        report: &Report,
        dir: &Path,
        settings: &ReportSettings,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(&settings.json_file_name);
        fs::write(&path, Self::views_json(report)?)?;
        info!("Wrote derived tables to {}", path.display());
        Ok(path)
    }

    /// One PNG per chapter, numbered in document order.
    pub fn write_pngs(
        report: &Report,
        dir: &Path,
        settings: &ReportSettings,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::with_capacity(report.chapters.len());
        for (i, chapter) in report.chapters.iter().enumerate() {
            let path = dir.join(png_file_name(i, chapter.view.spec.title));
            StaticChartRenderer::save_png(&chapter.view, &path, settings.chart_size).map_err(
                |source| ExportError::Render {
                    title: chapter.view.spec.title.to_string(),
                    source,
                },
            )?;
            written.push(path);
        }
        info!("Wrote {} chart images to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Open an exported file with the system default application.
    pub fn open(path: &Path) -> Result<(), ExportError> {
        open::that(path).map_err(|e| {
            warn!("Could not open {}: {}", path.display(), e);
            ExportError::Open(path.to_path_buf())
        })
    }

    fn html_table(headers: &[&str], rows: &[[String; 5]]) -> String {
        let mut html = String::from("<table>\n<thead><tr>");
        for header in headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }
}

/// `"03_most_popular_genres.png"`
fn png_file_name(index: usize, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    format!("{:02}_{}.png", index + 1, slug.trim_matches('_'))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DramaLoader;
    use crate::report::{compute_report, narrative};

    const HEADER: &str = "Name,Year of release,Aired Date,Aired On,Number of Episode,Network,Duration,Content Rating,Synopsis,Cast,Genre,Tags,Rank,Rating";

    struct StubSvg;

    impl ChartRenderer for StubSvg {
        fn svg(&self, view: &View, _size: (u32, u32)) -> Result<String, RenderError> {
            Ok(format!("<svg data-view=\"{}\"></svg>", view.spec.title))
        }
    }

    struct FailingSvg;

    impl ChartRenderer for FailingSvg {
        fn svg(&self, _view: &View, _size: (u32, u32)) -> Result<String, RenderError> {
            Err(RenderError::Draw("no font".into()))
        }
    }

    fn report() -> Report {
        let csv = [
            HEADER,
            r#"Tom & Jerry <Live>,2019,x,Friday,16,tvN,1h,15+,s,c,"Romance, Comedy","Love, Friendship",#1,9.1"#,
            r#"Second,2015,x,"Friday, Saturday",12,,1h,18+,s,c,Romance,Revenge,#2,8.8"#,
            r#"Third,2019,x,Monday,20,JTBC,1h,15+,s,c,Thriller,Friendship,#3,8.7"#,
        ]
        .join("\n");
        let table = DramaLoader::parse(csv.as_bytes(), Path::new("inline.csv")).unwrap();
        compute_report(&table, &ReportSettings::default()).unwrap()
    }

    #[test]
    fn html_follows_report_order() {
        let report = report();
        let html = ReportExporter::html_document(&report, &StubSvg, (900, 560)).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        let mut cursor = 0;
        for chapter in &report.chapters {
            let at = html[cursor..]
                .find(&escape_html(chapter.heading))
                .map(|i| cursor + i)
                .unwrap_or_else(|| panic!("missing {}", chapter.heading));
            cursor = at;
        }
        let epilogue = html.find(&escape_html(narrative::EPILOGUE)).unwrap();
        assert!(epilogue > cursor);
    }

    #[test]
    fn table_view_is_html_and_charts_are_svg() {
        let html = ReportExporter::html_document(&report(), &StubSvg, (900, 560)).unwrap();

        assert_eq!(html.matches("<svg data-view=").count(), 7);
        assert_eq!(html.matches("<table>").count(), 1);
        assert!(html.contains("<th>Drama Name</th>"));
        assert!(html.contains("<td>Tom &amp; Jerry &lt;Live&gt;</td>"));
    }

    #[test]
    fn render_failure_names_the_view() {
        let err = ReportExporter::html_document(&report(), &FailingSvg, (900, 560)).unwrap_err();
        assert!(matches!(err, ExportError::Render { ref title, .. } if title == "Number of K-Dramas by Year"));
    }

    #[test]
    fn writes_html_and_json_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings::default();
        let report = report();

        let html = ReportExporter::write_html(&report, &StubSvg, dir.path(), &settings).unwrap();
        assert_eq!(html, dir.path().join("kdrama_report.html"));

        let json = ReportExporter::write_json(&report, dir.path(), &settings).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
        let views = value["views"].as_array().unwrap();
        assert_eq!(views.len(), 8);
        assert_eq!(views[0]["kind"], "year_counts");
        assert_eq!(views[0]["rows"][0]["year"], 2015);
        assert_eq!(views[7]["kind"], "top_dramas");
    }

    #[test]
    fn png_names_are_numbered_slugs() {
        assert_eq!(png_file_name(0, "Dramas Released per Year"), "01_dramas_released_per_year.png");
        assert_eq!(png_file_name(9, "Rating vs. Episodes!"), "10_rating_vs_episodes.png");
    }
}

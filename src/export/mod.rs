//! Export the displayed folder as JSON, CSV or a standalone HTML page.

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::gallery::{FolderView, ImageArea, Thumbnail};
use crate::html::{escape_html, text_to_html};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Html => "HTML",
        }
    }
}

/// One image row in an export
#[derive(Debug, Serialize)]
pub struct ExportedImage {
    /// "cover", "page" or "tile"
    pub role: &'static str,
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Serialize)]
pub struct ExportedFolder {
    pub title: String,
    pub folder_id: String,
    pub book: bool,
    pub description: Option<String>,
    pub exported_at: DateTime<Local>,
    pub images: Vec<ExportedImage>,
}

impl ExportedFolder {
    pub fn from_view(title: &str, view: &FolderView) -> Self {
        fn row(role: &'static str, thumb: &Thumbnail) -> ExportedImage {
            ExportedImage {
                role,
                id: thumb.entry.id.clone(),
                name: thumb.entry.name.clone(),
                mime_type: thumb.entry.mime_type.clone(),
                thumbnail_url: thumb.url.clone(),
            }
        }

        let mut images: Vec<ExportedImage> = view.cover.iter().map(|c| row("cover", c)).collect();
        match &view.area {
            ImageArea::Pages(pages) => images.extend(pages.iter().map(|p| row("page", p))),
            ImageArea::Tiles(tiles) => images.extend(tiles.iter().map(|t| row("tile", &t.thumbnail))),
        }

        Self {
            title: title.to_string(),
            folder_id: view.folder_id.clone(),
            book: view.options.is_book,
            description: view.description.clone(),
            exported_at: Local::now(),
            images,
        }
    }
}

/// Default file name for an export, e.g. `drivefolio-Alpha-20240101-120000.html`.
pub fn default_export_path(dir: &Path, title: &str, format: ExportFormat) -> PathBuf {
    let slug: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!(
        "drivefolio-{}-{}.{}",
        slug,
        Local::now().format("%Y%m%d-%H%M%S"),
        format.extension()
    ))
}

/// Write the folder to `output_path`. Returns the number of images written.
pub fn export_folder(title: &str, view: &FolderView, output_path: &Path, format: ExportFormat) -> Result<usize> {
    let folder = ExportedFolder::from_view(title, view);
    let count = folder.images.len();

    match format {
        ExportFormat::Json => export_json(&folder, output_path)?,
        ExportFormat::Csv => export_csv(&folder, output_path)?,
        ExportFormat::Html => export_html(&folder, output_path)?,
    }

    Ok(count)
}

fn export_json(folder: &ExportedFolder, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(folder)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(folder: &ExportedFolder, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["role", "id", "name", "mime_type", "thumbnail_url"])?;

    for image in &folder.images {
        wtr.write_record([
            image.role,
            image.id.as_str(),
            image.name.as_str(),
            image.mime_type.as_str(),
            image.thumbnail_url.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn export_html(folder: &ExportedFolder, output_path: &Path) -> Result<()> {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background: #111;
            color: #e0e0e0;
        }}
        .book-cover {{ max-width: 600px; display: block; margin-bottom: 20px; }}
        .folder-description {{ line-height: 1.6; margin-bottom: 20px; }}
        .grid {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
            gap: 12px;
        }}
        .thumb {{ width: 100%; aspect-ratio: 1; object-fit: cover; }}
        .spread {{ width: 100%; display: block; margin-bottom: 16px; }}
        footer {{ color: #777; font-size: 12px; margin-top: 30px; }}
    </style>
</head>
<body>
    <h1>{}</h1>
"#,
        escape_html(&folder.title),
        escape_html(&folder.title)
    ));

    for cover in folder.images.iter().filter(|i| i.role == "cover") {
        html.push_str(&format!(
            "    <img class=\"book-cover\" src=\"{}\" alt=\"{}\">\n",
            escape_html(&cover.thumbnail_url),
            escape_html(&cover.name)
        ));
    }

    if let Some(ref description) = folder.description {
        html.push_str(&format!(
            "    <div class=\"folder-description\">{}</div>\n",
            text_to_html(description)
        ));
    }

    let (container, class) = if folder.book {
        ("pages", "spread")
    } else {
        ("grid", "thumb")
    };
    html.push_str(&format!("    <div class=\"{}\">\n", container));
    for (idx, image) in folder.images.iter().filter(|i| i.role != "cover").enumerate() {
        html.push_str(&format!(
            "        <img class=\"{}\" data-index=\"{}\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
            class,
            idx,
            escape_html(&image.thumbnail_url),
            escape_html(&image.name)
        ));
    }
    html.push_str("    </div>\n");

    html.push_str(&format!(
        "    <footer>Exported {}</footer>\n</body>\n</html>\n",
        folder.exported_at.format("%Y-%m-%d %H:%M")
    ));

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::RemoteEntry;
    use crate::gallery::ViewOptions;
    use tempfile::tempdir;

    fn thumb(id: &str, name: &str) -> Thumbnail {
        Thumbnail::new(
            RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: "image/jpeg".to_string(),
            },
            format!("https://drive.google.com/thumbnail?id={}&sz=w800", id),
            None,
        )
    }

    fn book_view() -> FolderView {
        FolderView::from_parts(
            "folder",
            ViewOptions::book(),
            Some(thumb("c", "cover.jpg")),
            vec![thumb("1", "one.jpg"), thumb("2", "two.jpg")],
            Some("<script>alert(1)</script>\nsecond line".to_string()),
        )
    }

    #[test]
    fn test_html_escapes_description() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.html");

        let count = export_folder("My <Book>", &book_view(), &path, ExportFormat::Html).unwrap();
        assert_eq!(count, 3);

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;<br>second line"));
        assert!(html.contains("<title>My &lt;Book&gt;</title>"));
        assert!(html.contains("class=\"book-cover\""));
        assert_eq!(html.matches("class=\"spread\"").count(), 2);
        assert!(html.contains("&amp;sz=w800"));
    }

    #[test]
    fn test_csv_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export_folder("Book", &book_view(), &path, ExportFormat::Csv).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<(String, String)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[2].to_string())
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("cover".to_string(), "cover.jpg".to_string()),
                ("page".to_string(), "one.jpg".to_string()),
                ("page".to_string(), "two.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let view = FolderView::from_parts("g", ViewOptions::grid(), None, vec![thumb("a", "a.jpg")], None);

        export_folder("Grid", &view, &path, ExportFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["folder_id"], "g");
        assert_eq!(value["book"], false);
        assert!(value["description"].is_null());
        assert_eq!(value["images"][0]["role"], "tile");
    }

    #[test]
    fn test_default_export_path() {
        let path = default_export_path(Path::new("/tmp"), "My Book/2", ExportFormat::Html);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("drivefolio-My_Book_2-"));
        assert!(name.ends_with(".html"));
    }
}

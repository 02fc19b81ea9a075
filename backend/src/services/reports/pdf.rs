//! PDF rendering for check reports: one formatted page per check with a
//! header, status line, ride metadata block, per-item rows and the
//! inspector's signature image when one was captured.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::model::check::{CheckStatus, CheckWithResults};
use common::model::ride::Ride;
use genpdf::elements::{Break, Image as PdfImage, PageBreak, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::fs::{self, File};
use std::path::Path;
use tempfile::NamedTempFile;

const IMAGE_DPI: f64 = 150.0;
/// Signatures are capped the way the capture pad displays them.
const SIGNATURE_MAX_CSS_PX: f64 = 200.0;

/// Try the Arial family first; fall back to LiberationSans from the same
/// directory.
fn load_font(
    fonts_dir: &Path,
) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, String> {
    if let Ok(family) = genpdf::fonts::from_files(fonts_dir, "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(fonts_dir, "LiberationSans", None)
        .map_err(|e| format!("No usable font family in {}: {}", fonts_dir.display(), e))
}

/// A genpdf document with font, size and margins set.
pub fn configure_document(fonts_dir: &Path) -> Result<Document, String> {
    let font_family = load_font(fonts_dir)?;
    let mut doc = Document::new(font_family);
    doc.set_title("Check reports");
    doc.set_font_size(10);
    doc.set_line_spacing(1.0);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn heading(text: String) -> Paragraph {
    let mut p = Paragraph::new("");
    p.push(StyledString::new(text, Style::new().bold().with_font_size(14)));
    p
}

fn labeled(label: &str, value: &str) -> Paragraph {
    let mut p = Paragraph::new("");
    p.push(StyledString::new(format!("{}: ", label), Style::new().bold()));
    p.push(value.to_string());
    p
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "PASSED",
        CheckStatus::Partial => "PARTIAL",
        CheckStatus::Failed => "FAILED",
    }
}

/// Append one check's page content to the document. Temp files backing
/// signature images must outlive rendering, so the caller owns them.
pub fn append_check_page(
    doc: &mut Document,
    entry: &CheckWithResults,
    ride: &Ride,
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<(), String> {
    let check = &entry.check;

    doc.push(heading(format!(
        "{} — {} check",
        ride.name,
        check.frequency.as_str()
    )));
    doc.push(labeled("Status", status_text(check.status)));
    doc.push(Break::new(1));

    doc.push(labeled(
        "Date",
        &check.check_date.format("%Y-%m-%d %H:%M").to_string(),
    ));
    doc.push(labeled("Inspector", &check.inspector_name));
    if let Some(officer) = &check.compliance_officer {
        doc.push(labeled("Compliance officer", officer));
    }
    if let Some(weather) = &check.weather {
        doc.push(labeled("Weather", weather));
    }
    doc.push(labeled("Ride category", &ride.category));
    if let Some(serial) = &ride.serial_number {
        doc.push(labeled("Serial number", serial));
    }
    if let Some(manufacturer) = &ride.manufacturer {
        doc.push(labeled("Manufacturer", manufacturer));
    }
    doc.push(Break::new(1));

    doc.push(heading("Check items".to_string()));
    for result in &entry.results {
        let mark = if result.is_checked { "[x]" } else { "[ ]" };
        doc.push(Paragraph::new(format!("{} {}", mark, result.item_text)));
        if let Some(note) = &result.notes {
            let mut p = Paragraph::new("");
            p.push(StyledString::new(
                format!("      note: {}", note),
                Style::new().italic(),
            ));
            doc.push(p);
        }
    }
    doc.push(Break::new(1));

    if let Some(notes) = &check.notes {
        doc.push(labeled("Inspector notes", notes));
    }
    if let Some(env) = &check.environment_notes {
        doc.push(labeled("Environment", env));
    }

    if let Some(signature) = &check.signature {
        doc.push(Break::new(1));
        doc.push(labeled("Signed", &check.inspector_name));
        push_signature_image(doc, signature, temp_files)?;
    }
    Ok(())
}

/// Decode a base64 PNG signature, scale it to the pad's display size,
/// flatten any transparency over white and embed it via a temporary file.
fn push_signature_image(
    doc: &mut Document,
    signature_b64: &str,
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<(), String> {
    let bytes = BASE64
        .decode(signature_b64)
        .map_err(|e| format!("Bad signature image: {}", e))?;
    let img = load_from_memory(&bytes).map_err(|e| format!("Bad signature image: {}", e))?;

    let (orig_w, orig_h) = img.dimensions();
    // CSS px -> image px at IMAGE_DPI, assuming 96 CSS px per inch.
    let css_to_px = IMAGE_DPI / 96.0;
    let max_side = SIGNATURE_MAX_CSS_PX * css_to_px;
    let scale = (max_side / orig_w as f64)
        .min(max_side / orig_h as f64)
        .min(1.0);

    let resized: DynamicImage = if scale >= 1.0 {
        img
    } else {
        let new_w = (orig_w as f64 * scale).max(1.0).round() as u32;
        let new_h = (orig_h as f64 * scale).max(1.0).round() as u32;
        img.resize(new_w, new_h, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

    let mut tmp = NamedTempFile::new().map_err(|e| e.to_string())?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header().map_err(|e| e.to_string())?;
        writer.write_image_data(&raw).map_err(|e| e.to_string())?;
    }

    let mut img_elem = PdfImage::from_path(tmp.path()).map_err(|e| e.to_string())?;
    img_elem.set_dpi(IMAGE_DPI);
    temp_files.push(tmp);
    doc.push(img_elem);
    Ok(())
}

/// Render one page per check into `output`.
pub fn render_checks_report(
    checks: &[CheckWithResults],
    ride: &Ride,
    fonts_dir: &Path,
    output: &Path,
) -> Result<(), String> {
    let mut doc = configure_document(fonts_dir)?;
    let mut temp_files: Vec<NamedTempFile> = Vec::new();

    for (i, entry) in checks.iter().enumerate() {
        if i > 0 {
            doc.push(PageBreak::new());
        }
        append_check_page(&mut doc, entry, ride, &mut temp_files)?;
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let mut out_file = File::create(output).map_err(|e| e.to_string())?;
    doc.render(&mut out_file).map_err(|e| e.to_string())?;
    Ok(())
}

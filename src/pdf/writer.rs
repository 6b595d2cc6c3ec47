//! Render an [`AgentReport`] as a paginated PDF table

use super::encoding::{encode_utf16, encode_win_ansi, is_win_ansi};
use super::labels::Labels;
use super::layout::{
    self, Align, Column, BODY_SIZE, COLUMN_ALIGN, FIRST_TABLE_TOP, HEADER_HEIGHT, HEADER_SIZE, MARGIN,
    NEXT_TABLE_TOP, PAGE_HEIGHT, PAGE_WIDTH, ROW_HEIGHT, STAMP_SIZE, SUBTITLE_SIZE, TITLE_SIZE,
};
use crate::error::Result;
use crate::report::{format_currency, month_name, AgentReport, DisplayRow, Language, ReportPeriod};
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::path::{Path, PathBuf};

type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const SLATE_50: Rgb = [248, 250, 252];
const SLATE_200: Rgb = [226, 232, 240];
const SLATE_600: Rgb = [71, 85, 105];
const SLATE_900: Rgb = [15, 23, 42];
const GRID: Rgb = [200, 200, 200];

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Rendering inputs that do not come from the report itself
#[derive(Debug, Clone)]
pub struct PdfContext {
    pub language: Language,
    /// Timestamp printed under the title
    pub generated_at: NaiveDateTime,
}

/// `agent-premiums-{year}-{MM}.pdf`, with `00` as the month for all time
pub fn report_file_name(period: &ReportPeriod) -> String {
    let (year, month) = period.file_stamp();
    format!("agent-premiums-{}-{}.pdf", year, month)
}

/// Render the report to PDF bytes
pub fn render_pdf(report: &AgentReport, context: &PdfContext) -> Result<Vec<u8>> {
    let labels = Labels::for_language(context.language);

    let mut lines: Vec<TableLine> = report.rows.iter().map(TableLine::Agent).collect();
    lines.push(TableLine::Totals);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));

    let mut kids = Vec::new();
    let mut drawn = 0;
    for (page_index, count) in layout::paginate(lines.len()).into_iter().enumerate() {
        let mut canvas = Canvas::default();
        let table_top = if page_index == 0 {
            draw_title_block(&mut canvas, report, context, &labels);
            FIRST_TABLE_TOP
        } else {
            NEXT_TABLE_TOP
        };

        draw_header(&mut canvas, table_top, &labels);
        for (offset, line) in lines[drawn..drawn + count].iter().enumerate() {
            let top = table_top - HEADER_HEIGHT - offset as f32 * ROW_HEIGHT;
            draw_line(&mut canvas, top, drawn + offset, line, report, &labels);
        }
        drawn += count;

        let content = Content { operations: canvas.ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }
    debug!("Laid out {} table lines on {} pages", lines.len(), kids.len());

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count),
        "Resources" => dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH as i64),
            Object::Integer(PAGE_HEIGHT as i64),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_utf16(labels.title), StringFormat::Hexadecimal),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Render and write the report
///
/// When `target` is an existing directory the file is placed inside it under
/// [`report_file_name`]; otherwise `target` is the file path.
pub fn save_pdf(report: &AgentReport, context: &PdfContext, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(report_file_name(&report.period))
    } else {
        target.to_path_buf()
    };

    let bytes = render_pdf(report, context)?;
    fs::write(&path, &bytes)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

enum TableLine<'a> {
    Agent(&'a DisplayRow),
    Totals,
}

impl TableLine<'_> {
    fn cells(&self, report: &AgentReport, labels: &Labels) -> [String; 4] {
        match self {
            TableLine::Agent(row) => [
                row.team.clone(),
                row.aggregate.agent_name.clone(),
                row.previous_annualized
                    .map(format_currency)
                    .unwrap_or_else(|| "-".to_string()),
                format_currency(row.aggregate.annualized_premium),
            ],
            TableLine::Totals => [
                labels.total.to_string(),
                String::new(),
                format_currency(report.total_previous),
                format_currency(report.total_annualized),
            ],
        }
    }
}

fn draw_title_block(canvas: &mut Canvas, report: &AgentReport, context: &PdfContext, labels: &Labels) {
    canvas.text(MARGIN, PAGE_HEIGHT - 42.5, labels.title, TITLE_SIZE, true, BLACK);

    let prefix = match report.period {
        ReportPeriod::Range { .. } => labels.period,
        _ => labels.month,
    };
    let mut subtitle = format!("{}: {}", prefix, report.period.label(context.language));
    if report.selected_agents > 0 {
        subtitle.push_str(&format!(" ({} {})", report.selected_agents, labels.selected_agents));
    }
    canvas.text(MARGIN, PAGE_HEIGHT - 70.9, &subtitle, SUBTITLE_SIZE, false, BLACK);

    let stamp = format!("{}: {}", labels.generated, format_timestamp(context.generated_at, context.language));
    canvas.text(MARGIN, PAGE_HEIGHT - 90.7, &stamp, STAMP_SIZE, false, BLACK);
}

fn draw_header(canvas: &mut Canvas, top: f32, labels: &Labels) {
    let columns = layout::columns();
    let bottom = top - HEADER_HEIGHT;
    canvas.fill_rect(MARGIN, bottom, layout::table_width(), HEADER_HEIGHT, SLATE_600);
    for column in &columns {
        canvas.stroke_rect(column.x, bottom, column.width, HEADER_HEIGHT, GRID);
    }
    for (column, label) in columns.iter().zip(labels.headers) {
        let x = column.text_x(layout::text_width(label, HEADER_SIZE, true), Align::Left);
        canvas.text(x, baseline(bottom, HEADER_HEIGHT), label, HEADER_SIZE, true, WHITE);
    }
}

fn draw_line(canvas: &mut Canvas, top: f32, index: usize, line: &TableLine, report: &AgentReport, labels: &Labels) {
    let columns = layout::columns();
    let bottom = top - ROW_HEIGHT;

    let (fill, bold, color) = match line {
        TableLine::Totals => (Some(SLATE_200), true, SLATE_900),
        TableLine::Agent(_) if index % 2 == 1 => (Some(SLATE_50), false, BLACK),
        TableLine::Agent(_) => (None, false, BLACK),
    };
    if let Some(fill) = fill {
        canvas.fill_rect(MARGIN, bottom, layout::table_width(), ROW_HEIGHT, fill);
    }

    let cells = line.cells(report, labels);
    for ((column, align), cell) in columns.iter().zip(COLUMN_ALIGN).zip(&cells) {
        canvas.stroke_rect(column.x, bottom, column.width, ROW_HEIGHT, GRID);
        draw_cell(canvas, column, align, bottom, cell, bold, color);
    }
}

fn draw_cell(canvas: &mut Canvas, column: &Column, align: Align, bottom: f32, text: &str, bold: bool, color: Rgb) {
    let x = column.text_x(layout::text_width(text, BODY_SIZE, bold), align);
    canvas.text(x, baseline(bottom, ROW_HEIGHT), text, BODY_SIZE, bold, color);
}

fn baseline(bottom: f32, height: f32) -> f32 {
    bottom + (height - BODY_SIZE * 0.7) / 2.0
}

fn format_timestamp(at: NaiveDateTime, language: Language) -> String {
    match language {
        Language::En => at.format("%B %-d, %Y, %I:%M:%S %p").to_string(),
        Language::Es => format!(
            "{} de {} de {}, {:02}:{:02}:{:02}",
            at.day(),
            month_name(at.month0(), Language::Es),
            at.year(),
            at.hour(),
            at.minute(),
            at.second()
        ),
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn color_operands(rgb: Rgb) -> Vec<Object> {
    rgb.iter().map(|&c| (f32::from(c) / 255.0).into()).collect()
}

/// Accumulates page content operations
#[derive(Default)]
struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("rg", color_operands(color)));
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("RG", color_operands(color)));
        self.ops.push(Operation::new("w", vec![0.3f32.into()]));
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// One positioned text run; empty strings draw nothing
    ///
    /// Text the standard fonts cannot show is wrapped in an `/ActualText` span.
    fn text(&mut self, x: f32, y: f32, text: &str, size: f32, bold: bool, color: Rgb) {
        if text.is_empty() {
            return;
        }
        let actual_text = !is_win_ansi(text);
        if actual_text {
            let properties = dictionary! {
                "ActualText" => Object::String(encode_utf16(text), StringFormat::Hexadecimal),
            };
            self.ops.push(Operation::new(
                "BDC",
                vec![Object::Name(b"Span".to_vec()), Object::Dictionary(properties)],
            ));
        }

        let font = if bold { BOLD_FONT } else { REGULAR_FONT };
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), size.into()]));
        self.ops.push(Operation::new("rg", color_operands(color)));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]));
        self.ops.push(Operation::new("ET", vec![]));

        if actual_text {
            self.ops.push(Operation::new("EMC", vec![]));
        }
    }
}

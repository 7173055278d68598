use anyhow::{anyhow, Result};
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commands::{select_pages, split::split};
use crate::page_selection::PageSelection;
use crate::pdf::PdfDocument;
use crate::pdf::edit::{parse_page_order, reorder_pages, rotate_pages};
use crate::pdf::merge::{MergeInput, merge_files};
use crate::pdf::protect::{ProtectOptions, save_protected};
use crate::pdf::watermark::{WatermarkOptions, watermark_pages};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectPagesRequest {
    #[schemars(description = "Page selection (e.g., '1-3,5,7'; '*' or '' for all pages)")]
    #[serde(default)]
    pub pages: String,
    #[schemars(description = "PDF file to take the page count from")]
    pub path: Option<String>,
    #[schemars(description = "Page count to validate against when no path is given")]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PagesOutputRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page selection (e.g., '1-5,10'; '*' or '' for all pages)")]
    #[serde(default)]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeSource {
    #[schemars(description = "Path to a PDF file")]
    pub path: String,
    #[schemars(description = "Pages to take from this file (default: all)")]
    #[serde(default)]
    pub pages: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeRequest {
    #[schemars(description = "Files to merge, in order")]
    pub sources: Vec<MergeSource>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Groups separated by ';' (e.g., '1-3;4-6'); default one file per page")]
    #[serde(default)]
    pub groups: String,
    #[schemars(description = "Output directory")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RotateRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to rotate (default: all)")]
    #[serde(default)]
    pub pages: String,
    #[schemars(description = "Clockwise angle in degrees, a multiple of 90 (default: 90)")]
    #[serde(default = "default_angle")]
    pub angle: i64,
    #[schemars(description = "Output file path")]
    pub output: String,
}

fn default_angle() -> i64 {
    90
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReorderRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Every page number once, in the new order (e.g., '3,1,2')")]
    pub order: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WatermarkRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Watermark text")]
    pub text: String,
    #[schemars(description = "Pages to stamp (default: all)")]
    #[serde(default)]
    pub pages: String,
    #[schemars(description = "Font size in points (default: 48)")]
    pub font_size: Option<f32>,
    #[schemars(description = "Opacity between 0 and 1 (default: 0.3)")]
    pub opacity: Option<f32>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProtectRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Password needed to open the document")]
    #[serde(default)]
    pub user_password: String,
    #[schemars(description = "Password that lifts the restrictions (default: the user password)")]
    #[serde(default)]
    pub owner_password: String,
    #[schemars(description = "Allow printing (default: true)")]
    pub allow_print: Option<bool>,
    #[schemars(description = "Allow copying text and graphics (default: true)")]
    pub allow_copy: Option<bool>,
    #[schemars(description = "Allow editing and page assembly (default: true)")]
    pub allow_modify: Option<bool>,
    #[schemars(description = "Allow annotations and form filling (default: true)")]
    pub allow_annotate: Option<bool>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a tool result, or report its error as text.
fn respond<T: Serialize>(tool: &str, result: Result<T>) -> String {
    match result.and_then(|value| Ok(serde_json::to_string_pretty(&value)?)) {
        Ok(json) => json,
        Err(e) => {
            warn!(tool, error = %e, "tool failed");
            format!("Error: {}", e)
        }
    }
}

fn write_output(mut doc: lopdf::Document, output: String) -> Result<OutputResult> {
    let page_count = doc.get_pages().len() as u32;
    PdfDocument::save(&mut doc, &output)?;
    Ok(OutputResult {
        output_path: output,
        page_count,
    })
}

fn evaluate_selection(req: &SelectPagesRequest) -> Result<SelectPagesResult> {
    let total = match (&req.path, req.total_pages) {
        (Some(path), _) => PdfDocument::open(path)?.page_count(),
        (None, Some(total)) => total,
        (None, None) => return Err(anyhow!("Provide either path or total_pages")),
    };
    let selection = PageSelection::evaluate(&req.pages, total);
    Ok(SelectPagesResult {
        total_pages: total,
        page_numbers: selection.pages.iter().map(|index| index + 1).collect(),
        summary: selection.summary(),
        pages: selection.pages,
        error: selection.error,
    })
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, dates, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        respond("pdf_info", PdfDocument::open(&path).map(|doc| doc.get_info()))
    }

    #[tool(description = "Validate a page selection like '1-3,5,7' against a PDF or a page count. \
                          Returns 0-based page indices, 1-based page numbers, and the first error if any.")]
    fn pdf_select_pages(&self, Parameters(req): Parameters<SelectPagesRequest>) -> String {
        let result = evaluate_selection(&req);
        respond("pdf_select_pages", result)
    }

    #[tool(description = "Copy selected pages of a PDF into a new file")]
    fn pdf_extract(&self, Parameters(req): Parameters<PagesOutputRequest>) -> String {
        let result = PdfDocument::open(&req.path).and_then(|doc| {
            let pages = select_pages(&doc, &req.pages)?;
            write_output(doc.keep_pages(&pages)?, req.output)
        });
        respond("pdf_extract", result)
    }

    #[tool(description = "Merge several PDFs into one, optionally taking a page selection from each")]
    fn pdf_merge(&self, Parameters(req): Parameters<MergeRequest>) -> String {
        let inputs: Vec<MergeInput> = req
            .sources
            .into_iter()
            .map(|source| MergeInput::new(source.path, source.pages))
            .collect();
        let result = merge_files(&inputs).and_then(|doc| write_output(doc, req.output));
        respond("pdf_merge", result)
    }

    #[tool(description = "Split a PDF into one file per page, or per ';'-separated group of pages")]
    fn pdf_split(&self, Parameters(req): Parameters<SplitRequest>) -> String {
        let result = split(&req.path, &req.groups, &req.output_dir).map(|paths| SplitResult {
            files: paths
                .into_iter()
                .map(|path| path.display().to_string())
                .collect(),
        });
        respond("pdf_split", result)
    }

    #[tool(description = "Delete selected pages from a PDF and save the rest to a new file")]
    fn pdf_remove_pages(&self, Parameters(req): Parameters<PagesOutputRequest>) -> String {
        let result = PdfDocument::open(&req.path).and_then(|doc| {
            let pages = select_pages(&doc, &req.pages)?;
            write_output(doc.remove_pages(&pages)?, req.output)
        });
        respond("pdf_remove_pages", result)
    }

    #[tool(description = "Rotate selected pages clockwise by a multiple of 90 degrees")]
    fn pdf_rotate_pages(&self, Parameters(req): Parameters<RotateRequest>) -> String {
        let result = PdfDocument::open(&req.path).and_then(|mut doc| {
            let pages = select_pages(&doc, &req.pages)?;
            rotate_pages(&mut doc.doc, &pages, req.angle)?;
            write_output(doc.doc, req.output)
        });
        respond("pdf_rotate_pages", result)
    }

    #[tool(description = "Put the pages of a PDF in a new order; every page must appear exactly once")]
    fn pdf_reorder_pages(&self, Parameters(req): Parameters<ReorderRequest>) -> String {
        let result = PdfDocument::open(&req.path).and_then(|mut doc| {
            let order = parse_page_order(&req.order, doc.page_count())?;
            reorder_pages(&mut doc.doc, &order)?;
            write_output(doc.doc, req.output)
        });
        respond("pdf_reorder_pages", result)
    }

    #[tool(description = "Stamp a diagonal text watermark on selected pages")]
    fn pdf_watermark(&self, Parameters(req): Parameters<WatermarkRequest>) -> String {
        let defaults = WatermarkOptions::default();
        let options = WatermarkOptions {
            text: req.text,
            font_size: req.font_size.unwrap_or(defaults.font_size),
            opacity: req.opacity.unwrap_or(defaults.opacity),
        };
        let result = PdfDocument::open(&req.path).and_then(|mut doc| {
            let pages = select_pages(&doc, &req.pages)?;
            watermark_pages(&mut doc.doc, &pages, &options)?;
            write_output(doc.doc, req.output)
        });
        respond("pdf_watermark", result)
    }

    #[tool(description = "Encrypt a PDF with AES-256 behind user/owner passwords")]
    fn pdf_protect(&self, Parameters(req): Parameters<ProtectRequest>) -> String {
        let options = ProtectOptions {
            user_password: req.user_password,
            owner_password: req.owner_password,
            allow_print: req.allow_print.unwrap_or(true),
            allow_copy: req.allow_copy.unwrap_or(true),
            allow_modify: req.allow_modify.unwrap_or(true),
            allow_annotate: req.allow_annotate.unwrap_or(true),
        };
        let result = options
            .validate()
            .and_then(|()| PdfDocument::open(&req.path))
            .and_then(|mut doc| {
                let page_count = doc.page_count();
                save_protected(&mut doc.doc, &options, &req.output)?;
                Ok(OutputResult {
                    output_path: req.output,
                    page_count,
                })
            });
        respond("pdf_protect", result)
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SelectPagesResult {
    pub total_pages: u32,
    pub pages: Vec<u32>,
    pub page_numbers: Vec<u32>,
    pub error: Option<String>,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OutputResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub files: Vec<String>,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page tools. Page selections use 1-based numbers and ranges like '1-3,5,7'; \
                 '*' or an empty string selects every page. Use pdf_select_pages to check a \
                 selection, pdf_info for metadata, and pdf_extract, pdf_merge, pdf_split, \
                 pdf_remove_pages, pdf_rotate_pages, pdf_reorder_pages, pdf_watermark or \
                 pdf_protect to write new PDFs."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("starting MCP server on stdio");

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

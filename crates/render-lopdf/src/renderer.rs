use crate::error::RenderError;
use crate::helpers::{PageContext, build_outlines};
use chrono::{Local, NaiveDateTime};
use handlebars::Handlebars;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use ods_layout::LaidOutDocument;
use ods_style::Stylesheet;
use ods_types::{FontVariant, to_win_ansi};
use serde::Serialize;
use std::io::Write;

/// Metadata written to the document information dictionary.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Falls back to the title of the laid out document.
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    /// Defaults to the current local time.
    pub creation_date: Option<NaiveDateTime>,
}

#[derive(Serialize)]
struct FooterContext<'a> {
    page_num: usize,
    total_pages: usize,
    title: &'a str,
}

/// Writes laid out pages as a PDF document.
pub struct PdfRenderer<'a> {
    stylesheet: &'a Stylesheet,
    options: RenderOptions,
    template_engine: Handlebars<'static>,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(stylesheet: &'a Stylesheet, options: RenderOptions) -> Self {
        Self { stylesheet, options, template_engine: Handlebars::new() }
    }

    /// Renders the complete document in memory.
    pub fn render_to_bytes(&self, document: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        self.render(document, &mut buffer)?;
        Ok(buffer)
    }

    pub fn render<W: Write>(&self, document: &LaidOutDocument, writer: &mut W) -> Result<(), RenderError> {
        if document.pages.is_empty() {
            return Err(RenderError::Other("Document has no pages".into()));
        }
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for font in FontVariant::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            font_dict.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => font_dict });

        let page_width = document.page_size.width;
        let page_height = document.page_size.height;
        let page_layout = &self.stylesheet.page;
        let footer_style = page_layout
            .footer_style
            .as_deref()
            .map(|name| self.stylesheet.compute_style(name))
            .unwrap_or_default();
        let title = self.options.title.as_deref().unwrap_or(&document.title);
        let total_pages = document.page_count();

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(total_pages);
        for (index, page) in document.pages.iter().enumerate() {
            let mut page_ctx = PageContext::new(page_width, page_height);
            for item in &page.items {
                page_ctx.draw_item(item);
            }
            if let Some(footer_template) = &page_layout.footer_text {
                let context = FooterContext { page_num: index + 1, total_pages, title };
                let text = self.template_engine.render_template(footer_template, &context)?;
                page_ctx.draw_footer(&text, &footer_style, page_layout);
            }

            let content_id = doc.add_object(Stream::new(dictionary! {}, page_ctx.finish()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
            }
            .into(),
        );

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => pages_id };
        if let Some(outline_root_id) = build_outlines(&mut doc, &document.bookmarks, &page_ids, page_height) {
            catalog.set("Outlines", outline_root_id);
            catalog.set("PageMode", "UseOutlines");
        }
        let catalog_id = doc.add_object(catalog);
        let info_id = doc.add_object(self.info_dictionary(title));
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        doc.save_to(writer)?;
        log::debug!("Rendered '{}' with {} pages", title, total_pages);
        Ok(())
    }

    fn info_dictionary(&self, title: &str) -> Dictionary {
        let text = |s: &str| Object::String(to_win_ansi(s), StringFormat::Literal);
        let created = self.options.creation_date.unwrap_or_else(|| Local::now().naive_local());
        let mut info = dictionary! {
            "Title" => text(title),
            "Producer" => text("ods-report"),
            "CreationDate" => text(&created.format("D:%Y%m%d%H%M%S").to_string()),
        };
        let optional = [
            ("Author", &self.options.author),
            ("Subject", &self.options.subject),
            ("Creator", &self.options.creator),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                info.set(key, text(value));
            }
        }
        info
    }
}

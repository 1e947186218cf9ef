use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// RGB fill/stroke colour with channels in 0..=1.
pub type Tint = (f32, f32, f32);

pub const INK: Tint = (0.10, 0.10, 0.10);
pub const GRID: Tint = (0.85, 0.85, 0.85);
const HEADER_FILL: Tint = (0.85, 0.87, 0.90);
const STRIPE_FILL: Tint = (0.96, 0.96, 0.96);
const BORDER: Tint = (0.65, 0.65, 0.65);

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;

/// Low-level PDF document builder: pages, text and vector primitives with
/// the standard Helvetica font, so no font files are needed.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    /// A4 portrait, used for tables.
    pub fn new() -> Self {
        Self::with_page_size(595.0, 842.0)
    }

    /// A4 landscape, used for charts.
    pub fn landscape() -> Self {
        Self::with_page_size(842.0, 595.0)
    }

    fn with_page_size(page_w: f32, page_h: f32) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w,
            page_h,
            margin: 50.0,
            row_h: 20.0,

            next_id: 4,
            font_id,

            font_size: 10.0,
            header_font_size: 11.0,
            title_font_size: 16.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_w, self.page_h)
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    /// Start a new page and return its content stream.
    pub fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    /// Write the content stream of the current page.
    pub fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    /// Helvetica has no glyphs outside WinAnsi; keep to printable ASCII.
    fn pdf_text(text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
            .collect()
    }

    pub fn text_width(&self, size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size * AVG_GLYPH_WIDTH
    }

    pub fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        self.draw_text_rotated(content, x, y, size, 0.0, text);
    }

    pub fn draw_text_centered(
        &self,
        content: &mut Content,
        cx: f32,
        y: f32,
        size: f32,
        text: &str,
    ) {
        let x = cx - self.text_width(size, text) / 2.0;
        self.draw_text(content, x, y, size, text);
    }

    pub fn draw_text_right(
        &self,
        content: &mut Content,
        right: f32,
        y: f32,
        size: f32,
        text: &str,
    ) {
        let x = right - self.text_width(size, text);
        self.draw_text(content, x, y, size, text);
    }

    /// Text starting at (x, y), turned counter-clockwise by `degrees`.
    pub fn draw_text_rotated(
        &self,
        content: &mut Content,
        x: f32,
        y: f32,
        size: f32,
        degrees: f32,
        text: &str,
    ) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let bytes = Self::pdf_text(text);
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([cos, sin, -sin, cos, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    pub fn draw_line(
        &self,
        content: &mut Content,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        tint: Tint,
    ) {
        content.save_state();
        content.set_line_width(width);
        content.set_stroke_rgb(tint.0, tint.1, tint.2);
        content.move_to(from.0, from.1);
        content.line_to(to.0, to.1);
        content.stroke();
        content.restore_state();
    }

    pub fn draw_polyline(
        &self,
        content: &mut Content,
        points: &[(f32, f32)],
        width: f32,
        tint: Tint,
    ) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        content.save_state();
        content.set_line_width(width);
        content.set_stroke_rgb(tint.0, tint.1, tint.2);
        content.move_to(first.0, first.1);
        for p in rest {
            content.line_to(p.0, p.1);
        }
        content.stroke();
        content.restore_state();
    }

    pub fn fill_rect(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32, tint: Tint) {
        content.save_state();
        content.set_fill_rgb(tint.0, tint.1, tint.2);
        content.rect(x, y, w, h);
        content.fill_nonzero();
        content.restore_state();
    }

    pub fn stroke_rect(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32, tint: Tint) {
        content.save_state();
        content.set_line_width(0.6);
        content.set_stroke_rgb(tint.0, tint.1, tint.2);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    // ---------------------------
    // Tables
    // ---------------------------

    /// Column widths from header and content length, scaled to fit the page.
    fn compute_col_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| self.text_width(self.header_font_size, h) + 10.0)
            .collect();

        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = w.max(self.text_width(self.font_size, cell) + 10.0);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > max {
            let scale = max / total;
            widths.iter_mut().for_each(|w| *w *= scale);
        }

        widths
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        row: &[String],
        font_size: f32,
        right_aligned: &[usize],
    ) {
        let mut x = self.margin;
        for (i, (text, w)) in row.iter().zip(col_widths).enumerate() {
            if right_aligned.contains(&i) {
                self.draw_text_right(content, x + w - 5.0, y + 6.0, font_size, text);
            } else {
                self.draw_text(content, x + 5.0, y + 6.0, font_size, text);
            }
            self.stroke_rect(content, x, y, *w, self.row_h, BORDER);
            x += w;
        }
    }

    fn draw_table_page_frame(
        &self,
        content: &mut Content,
        title: &str,
        subtitle: Option<&str>,
        page: usize,
    ) {
        let top = self.page_h - self.margin;
        self.draw_text(content, self.margin, top, self.title_font_size, title);
        if let Some(sub) = subtitle {
            self.draw_text(content, self.margin, top - 18.0, self.font_size, sub);
        }
        self.draw_text_right(
            content,
            self.page_w - self.margin,
            self.margin - 30.0,
            self.font_size,
            &format!("Page {}", page),
        );
    }

    /// Paginated table under a title. Columns listed in `right_aligned` are
    /// right-aligned (numbers). An empty table still gets its header row.
    pub fn write_table(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        headers: &[&str],
        rows: &[Vec<String>],
        right_aligned: &[usize],
    ) {
        let col_widths = self.compute_col_widths(headers, rows);
        let table_w: f32 = col_widths.iter().sum();
        let header_row: Vec<String> = headers.iter().map(|s| s.to_string()).collect();

        let mut remaining: &[Vec<String>] = rows;
        let mut page_idx = 1;

        loop {
            let mut content = self.new_page();
            self.draw_table_page_frame(&mut content, title, subtitle, page_idx);

            let mut y = self.page_h - self.margin - 50.0;
            self.fill_rect(
                &mut content,
                self.margin,
                y,
                table_w,
                self.row_h,
                HEADER_FILL,
            );
            self.draw_row(
                &mut content,
                y,
                &col_widths,
                &header_row,
                self.header_font_size,
                right_aligned,
            );
            y -= self.row_h;

            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y < self.margin {
                    break;
                }
                if i % 2 == 1 {
                    self.fill_rect(
                        &mut content,
                        self.margin,
                        y,
                        table_w,
                        self.row_h,
                        STRIPE_FILL,
                    );
                }
                self.draw_row(
                    &mut content,
                    y,
                    &col_widths,
                    row,
                    self.font_size,
                    right_aligned,
                );
                y -= self.row_h;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            page_idx += 1;

            if remaining.is_empty() {
                break;
            }
        }
    }

    /// Build the catalog and page tree and return the document bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);

        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.iter().copied());
        drop(pages);

        self.pdf.finish()
    }

    pub fn save(self, path: &Path) -> std::io::Result<()> {
        let bytes = self.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

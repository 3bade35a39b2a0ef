use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Text;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Writes `input` starting at `(x, y)`, skipping the first `start_col` display columns and never
/// writing more than `max_cols` columns. Returns the number of columns written.
///
/// Tabs expand to four spaces. Wide characters that straddle either edge are dropped rather than
/// split.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;

    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let (sym, w): (&str, usize) = if ch == '\t' {
            ("    ", 4)
        } else {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            (&*ch.encode_utf8(&mut tmp), w)
        };
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }

        let cx = x.saturating_add(out_cols as u16);
        if ch == '\t' {
            for dx in 0..4u16 {
                if let Some(cell) = buf.cell_mut((cx.saturating_add(dx), y)) {
                    cell.set_style(style);
                    cell.set_symbol(" ");
                }
            }
        } else {
            if let Some(cell) = buf.cell_mut((cx, y)) {
                cell.set_style(style);
                cell.set_symbol(sym);
            }
            if w == 2 {
                if let Some(cell) = buf.cell_mut((cx.saturating_add(1), y)) {
                    cell.set_style(style);
                    cell.set_symbol("");
                }
            }
        }
        out_cols += w;
        col += w;
    }

    out_cols as u16
}

/// Renders one styled line clipped to `max_cols`. Spans without their own style use
/// `fallback_style`.
pub fn render_line_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    line: &Line<'_>,
    fallback_style: Style,
) {
    let mut used = 0u16;
    for span in &line.spans {
        if used >= max_cols {
            return;
        }
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            fallback_style.patch(span.style)
        };
        used += render_str_clipped(
            x.saturating_add(used),
            y,
            0,
            max_cols - used,
            buf,
            &span.content,
            style,
        );
    }
}

/// Paints every cell of `area` blank with `style`.
pub fn clear_area(area: Rect, buf: &mut Buffer, style: Style) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.reset();
                cell.set_style(style);
            }
        }
    }
}

/// Display size of `text` as `(columns, rows)`.
pub fn text_size(text: &Text<'_>) -> (u16, u16) {
    let w = text
        .lines
        .iter()
        .map(|l| {
            l.spans
                .iter()
                .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0);
    (
        w.min(u16::MAX as usize) as u16,
        text.lines.len().min(u16::MAX as usize) as u16,
    )
}

/// A `width` x `height` rect centered in `outer`, shrunk to fit.
pub fn centered_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(outer.width);
    let h = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - w) / 2,
        outer.y + (outer.height - h) / 2,
        w,
        h,
    )
}

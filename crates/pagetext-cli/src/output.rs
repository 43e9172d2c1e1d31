use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;

const BANNER_WIDTH: usize = 50;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn banner(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    let line = "=".repeat(BANNER_WIDTH);
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

/// Print the page count and, unless `quiet`, the rendered text between banners.
pub fn print_extraction(
    w: &mut dyn Write,
    page_count: usize,
    text: &str,
    quiet: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Total pages: {}", page_count)?;
    if quiet {
        return Ok(());
    }
    banner(w, color)?;
    writeln!(w, "{}", text)?;
    banner(w, color)?;
    Ok(())
}

/// Print the confirmation line after the output file was written.
pub fn print_saved(w: &mut dyn Write, output: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Text saved to:".green(), output.display())
    } else {
        writeln!(w, "Text saved to: {}", output.display())
    }
}

/// Print the single diagnostic line for a missing input file.
pub fn print_not_found(w: &mut dyn Write, input: &Path, color: ColorMode) -> std::io::Result<()> {
    let msg = format!("File not found: {}", input.display());
    if color.enabled() {
        writeln!(w, "{}", msg.red())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print the single diagnostic line for a failed extraction or write.
pub fn print_error(
    w: &mut dyn Write,
    context: &str,
    err: &dyn std::error::Error,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("{}: {}", context, err);
    if color.enabled() {
        writeln!(w, "{}", msg.red())
    } else {
        writeln!(w, "{}", msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: ColorMode = ColorMode(false);

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf as &mut dyn Write).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn extraction_report_wraps_text_in_banners() {
        let text = "\n--- PAGE 1 ---\na\n--- PAGE 2 ---\nb";
        let out = render(|w| print_extraction(w, 2, text, false, PLAIN));
        let banner = "=".repeat(BANNER_WIDTH);
        assert_eq!(
            out,
            format!("Total pages: 2\n{banner}\n\n--- PAGE 1 ---\na\n--- PAGE 2 ---\nb\n{banner}\n")
        );
    }

    #[test]
    fn quiet_report_omits_text() {
        let out = render(|w| print_extraction(w, 3, "secret body", true, PLAIN));
        assert_eq!(out, "Total pages: 3\n");
    }

    #[test]
    fn saved_line_names_output() {
        let out = render(|w| print_saved(w, Path::new("extracted_text.txt"), PLAIN));
        assert_eq!(out, "Text saved to: extracted_text.txt\n");
    }

    #[test]
    fn not_found_is_single_line() {
        let out = render(|w| print_not_found(w, Path::new("members.pdf"), PLAIN));
        assert_eq!(out, "File not found: members.pdf\n");
    }

    #[test]
    fn error_line_includes_context() {
        let err = std::io::Error::other("boom");
        let out = render(|w| print_error(w, "Error extracting text", &err, PLAIN));
        assert_eq!(out, "Error extracting text: boom\n");
    }

    #[test]
    fn colored_output_keeps_message() {
        let out = render(|w| print_saved(w, Path::new("x.txt"), ColorMode(true)));
        assert!(out.contains("Text saved to:"));
        assert!(out.contains("x.txt"));
        assert!(out.contains('\u{1b}'));
    }
}

pub mod ident;
pub mod writer;

use crate::config::EmitOptions;
use crate::glyph::table::{GlyphTable, CODE_COUNT};
use crate::source::FontDescriptor;
use ident::include_guard;
use writer::{hex_list, CodeWriter};

const MAPPING_PER_LINE: usize = 16;

/// Generated header and source for one font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CModule {
    pub header_name: String,
    pub source_name: String,
    pub header: String,
    pub source: String,
}

/// Names of the two table variables.
pub fn table_names(descriptor: &FontDescriptor) -> (String, String) {
    (format!("{}_letters", descriptor.identifier), format!("{}_mapping", descriptor.identifier))
}

/// Generate the header and source; `bpp` is the value published as `FONT_BPP`.
pub fn emit(
    descriptor: &FontDescriptor,
    table: &GlyphTable,
    bpp: u32,
    options: &EmitOptions,
) -> CModule {
    let header_name = format!("{}.h", descriptor.name);
    let source_name = format!("{}.c", descriptor.name);
    let (letters, mapping) = table_names(descriptor);
    let qualifier = if options.const_tables { "const " } else { "" };
    let row_type = descriptor.primitive.c_type();
    let letters_decl = format!(
        "{qualifier}{row_type} {letters}[{}][{}]",
        table.glyphs().len(),
        table.height()
    );
    let mapping_decl = format!("{qualifier}uint8_t {mapping}[{CODE_COUNT}]");

    let mut header = CodeWriter::new();
    let guard = include_guard(&descriptor.identifier);
    header.line(format!("#ifndef {guard}")).define(&guard, "").blank();
    header.comment(&banner(descriptor, options)).blank();
    header.include_system("stdint.h").blank();
    header
        .define("FONT_WIDTH", descriptor.public_width())
        .define("FONT_HEIGHT", table.height())
        .define("FONT_BPP", bpp)
        .blank();
    header.line(format!("typedef {row_type} FONT_ROW_TYPE;")).blank();
    header.line(format!("extern {letters_decl};"));
    header.line(format!("extern {mapping_decl};"));
    header.blank().line(format!("#endif /* {guard} */"));

    let mut source = CodeWriter::new();
    source.include_local(&header_name).blank();
    source.open(format!("{letters_decl} ="));
    for glyph in table.glyphs() {
        source.line(format!("{{{}}},", hex_list(glyph.rows().iter().copied())));
    }
    source.close(";").blank();
    source.open(format!("{mapping_decl} ="));
    for chunk in table.mapping().chunks(MAPPING_PER_LINE) {
        source.line(format!("{},", hex_list(chunk.iter().copied())));
    }
    source.close(";");

    CModule { header_name, source_name, header: header.into_code(), source: source.into_code() }
}

fn banner(descriptor: &FontDescriptor, options: &EmitOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(author) = &options.author {
        lines.push(format!("Author: {}", comment_safe(author)));
        lines.push(String::new());
    }
    lines.push(format!(
        "This file was automatically generated by cfont from {}.",
        comment_safe(&descriptor.name)
    ));
    lines.push("Do not edit it by hand.".to_string());
    lines
}

fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Whether `name` can be used as an output file stem and in `#include "..."`.
pub fn is_valid_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|ch| ch.is_control() || matches!(ch, '/' | '\\' | '"' | '<' | '>'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::bitmap::GlyphBitmap;
    use crate::source::GlyphSource;
    use crate::FontError;

    struct TwoGlyphs;

    impl GlyphSource for TwoGlyphs {
        fn name(&self) -> &str {
            "Noto-Sans-Mono-Regular"
        }

        fn width(&self) -> u32 {
            12
        }

        fn bpp(&self) -> u32 {
            2
        }

        fn render(&self, ch: char) -> Result<GlyphBitmap, FontError> {
            Ok(GlyphBitmap::new(if ch == 'A' { vec![0xfff, 0x30] } else { vec![0, 0] }))
        }
    }

    fn module(options: &EmitOptions) -> CModule {
        let descriptor = TwoGlyphs.descriptor().unwrap();
        let table = GlyphTable::build(&TwoGlyphs, |_| {}).unwrap();
        emit(&descriptor, &table, 2, options)
    }

    #[test]
    fn header_declares_constants_and_tables() {
        let module = module(&EmitOptions::default());
        assert_eq!(module.header_name, "Noto-Sans-Mono-Regular.h");
        let header = &module.header;
        assert!(header
            .starts_with("#ifndef NOTO_SANS_MONO_REGULAR_H\n#define NOTO_SANS_MONO_REGULAR_H\n"));
        assert!(header.contains("#include <stdint.h>\n"));
        assert!(header.contains("#define FONT_WIDTH 12\n"));
        assert!(header.contains("#define FONT_HEIGHT 2\n"));
        assert!(header.contains("#define FONT_BPP 2\n"));
        assert!(header.contains("typedef uint32_t FONT_ROW_TYPE;\n"));
        assert!(header.contains("extern const uint32_t noto_sans_mono_regular_letters[2][2];\n"));
        assert!(header.contains("extern const uint8_t noto_sans_mono_regular_mapping[256];\n"));
        assert!(header.ends_with("#endif /* NOTO_SANS_MONO_REGULAR_H */\n"));
    }

    #[test]
    fn source_includes_sibling_header_and_hex_tables() {
        let module = module(&EmitOptions::default());
        assert_eq!(module.source_name, "Noto-Sans-Mono-Regular.c");
        let source = &module.source;
        assert!(source.starts_with("#include \"Noto-Sans-Mono-Regular.h\"\n"));
        assert!(source.contains(
            "const uint32_t noto_sans_mono_regular_letters[2][2] = {\n    {0x0, 0x0},\n    {0xfff, 0x30},\n};\n"
        ));
        assert!(source.contains("const uint8_t noto_sans_mono_regular_mapping[256] = {\n"));
        // 'A' is 0x41: fifth line, second entry.
        assert!(source.contains(
            "    0x0, 0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,\n"
        ));
        assert_eq!(source.matches("0x1,").count(), 1);
    }

    #[test]
    fn author_and_mutability_options() {
        let options = EmitOptions {
            author: Some("Jane */ Doe".to_string()),
            const_tables: false,
            ..Default::default()
        };
        let module = module(&options);
        assert!(module.header.contains(" * Author: Jane * / Doe\n"));
        assert!(module.header.contains("extern uint32_t noto_sans_mono_regular_letters"));
        assert!(module.source.contains("\nuint8_t noto_sans_mono_regular_mapping[256] = {"));
    }

    #[test]
    fn file_stems() {
        assert!(is_valid_file_stem("Noto-Sans-Mono-Regular"));
        assert!(is_valid_file_stem("My Font"));
        assert!(!is_valid_file_stem("a/b"));
        assert!(!is_valid_file_stem("quote\""));
        assert!(!is_valid_file_stem(""));
    }
}

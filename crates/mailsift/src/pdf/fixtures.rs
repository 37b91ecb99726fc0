//! Small PDFs built in memory for tests.

use lopdf::{Document, Object, Stream, dictionary};

struct PageSpec {
    content: String,
    with_image: bool,
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

fn text_content(text: &str) -> String {
    format!("BT /F1 12 Tf 72 700 Td ({}) Tj ET", escape(text))
}

fn build(pages: Vec<PageSpec>, info: Option<(&str, &str)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for spec in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, spec.content.into_bytes()));
        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if spec.with_image {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 2,
                    "Height" => 2,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0, 255, 255, 0],
            ));
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some((title, author)) = info {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal(author),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// One page per entry, each showing its text in Helvetica.
pub(crate) fn text_pdf(pages: &[&str]) -> Vec<u8> {
    build(
        pages
            .iter()
            .map(|text| PageSpec {
                content: text_content(text),
                with_image: false,
            })
            .collect(),
        None,
    )
}

/// Single text page carrying a document info dictionary.
pub(crate) fn titled_pdf(text: &str, title: &str, author: &str) -> Vec<u8> {
    build(
        vec![PageSpec {
            content: text_content(text),
            with_image: false,
        }],
        Some((title, author)),
    )
}

/// `pages` blank pages; page `image_page` (1-based) draws a tiny grey image.
pub(crate) fn image_pdf(pages: usize, image_page: usize) -> Vec<u8> {
    build(
        (1..=pages)
            .map(|number| PageSpec {
                content: if number == image_page {
                    "q 100 0 0 100 72 600 cm /Im1 Do Q".to_string()
                } else {
                    String::new()
                },
                with_image: number == image_page,
            })
            .collect(),
        None,
    )
}

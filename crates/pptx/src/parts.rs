//! Generators for the package parts that depend on presentation content.

use crate::template::*;
use crate::xml::XmlBuilder;
use chrono::{DateTime, Utc};
use slide_tables_core::{
    DocumentProperties, Emu, Presentation, Result, Slide, SlideLayout, TableShape,
    FONT_SIZE_CENTIPOINTS,
};

/// Relationship id of the first slide in `presentation.xml.rels`. Lower ids
/// are taken by the master, presProps, viewProps, theme and tableStyles.
pub const FIRST_SLIDE_REL_ID: usize = 6;

/// Id of the first slide in `p:sldIdLst`; the schema requires ids >= 256.
const FIRST_SLIDE_ID: usize = 256;

const MASTER_ID: &str = "2147483648";
const FIRST_LAYOUT_ID: u64 = 2_147_483_649;

/// 1-based number of the layout's part (`slideLayoutN.xml`).
pub fn layout_part_number(layout: SlideLayout) -> usize {
    SlideLayout::ALL
        .iter()
        .position(|l| *l == layout)
        .map_or(1, |i| i + 1)
}

pub fn slide_part_name(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

pub fn slide_rels_part_name(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

pub fn layout_part_name(number: usize) -> String {
    format!("ppt/slideLayouts/slideLayout{}.xml", number)
}

pub fn layout_rels_part_name(number: usize) -> String {
    format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", number)
}

fn write_relationships(xml: &mut XmlBuilder, rels: &[(String, &str, String)]) -> Result<()> {
    xml.start("Relationships", &[("xmlns", NS_RELS)])?;
    for (id, rel_type, target) in rels {
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")
}

fn rid(n: usize) -> String {
    format!("rId{}", n)
}

pub fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_SLIDE_MASTER),
    ];
    for number in 1..=SlideLayout::ALL.len() {
        overrides.push((format!("/{}", layout_part_name(number)), CT_SLIDE_LAYOUT));
    }
    for number in 1..=slide_count {
        overrides.push((format!("/{}", slide_part_name(number)), CT_SLIDE));
    }
    overrides.extend([
        ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
        ("/ppt/presProps.xml".to_string(), CT_PRES_PROPS),
        ("/ppt/viewProps.xml".to_string(), CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml".to_string(), CT_TABLE_STYLES),
        ("/docProps/core.xml".to_string(), CT_CORE_PROPS),
        ("/docProps/app.xml".to_string(), CT_EXTENDED_PROPS),
    ]);

    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

pub fn root_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    write_relationships(
        &mut xml,
        &[
            (rid(1), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
            (rid(2), REL_CORE_PROPS, "docProps/core.xml".to_string()),
            (rid(3), REL_EXTENDED_PROPS, "docProps/app.xml".to_string()),
        ],
    )?;
    Ok(xml.finish())
}

pub fn core_props_xml(props: &DocumentProperties, timestamp: DateTime<Utc>) -> Result<Vec<u8>> {
    let stamp = timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let w3cdtf = [("xsi:type", "dcterms:W3CDTF")];

    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", &[], &props.title)?;
    xml.text_element("dc:creator", &[], &props.creator)?;
    xml.text_element("cp:lastModifiedBy", &[], &props.creator)?;
    xml.text_element("cp:revision", &[], "1")?;
    xml.text_element("dcterms:created", &w3cdtf, &stamp)?;
    xml.text_element("dcterms:modified", &w3cdtf, &stamp)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

pub fn app_props_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("TotalTime", &[], "0")?;
    xml.text_element("Application", &[], &prs.properties.creator)?;
    xml.text_element("PresentationFormat", &[], "Custom")?;
    xml.text_element("Slides", &[], &prs.slide_count().to_string())?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

pub fn presentation_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", MASTER_ID), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    if !prs.slides.is_empty() {
        xml.start("p:sldIdLst", &[])?;
        for index in 0..prs.slides.len() {
            xml.empty(
                "p:sldId",
                &[
                    ("id", (FIRST_SLIDE_ID + index).to_string().as_str()),
                    ("r:id", rid(FIRST_SLIDE_REL_ID + index).as_str()),
                ],
            )?;
        }
        xml.end("p:sldIdLst")?;
    }

    xml.empty(
        "p:sldSz",
        &[
            ("cx", prs.slide_width.to_string().as_str()),
            ("cy", prs.slide_height.to_string().as_str()),
        ],
    )?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

pub fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        (rid(1), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        (rid(2), REL_PRES_PROPS, "presProps.xml".to_string()),
        (rid(3), REL_VIEW_PROPS, "viewProps.xml".to_string()),
        (rid(4), REL_THEME, "theme/theme1.xml".to_string()),
        (rid(5), REL_TABLE_STYLES, "tableStyles.xml".to_string()),
    ];
    for index in 0..slide_count {
        rels.push((
            rid(FIRST_SLIDE_REL_ID + index),
            REL_SLIDE,
            format!("slides/slide{}.xml", index + 1),
        ));
    }

    let mut xml = XmlBuilder::new()?;
    write_relationships(&mut xml, &rels)?;
    Ok(xml.finish())
}

/// Title placeholder frame scaled to the slide size.
fn title_frame(prs: &Presentation) -> (Emu, Emu, Emu, Emu) {
    let x = prs.slide_width.0 / 20;
    let y = prs.slide_height.0 / 25;
    (
        Emu(x),
        Emu(y),
        Emu(prs.slide_width.0 - 2 * x),
        Emu(prs.slide_height.0 / 6),
    )
}

fn write_group_header(xml: &mut XmlBuilder) -> Result<()> {
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;

    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")
}

fn write_xfrm(xml: &mut XmlBuilder, tag: &str, x: Emu, y: Emu, cx: Emu, cy: Emu) -> Result<()> {
    xml.start(tag, &[])?;
    xml.empty(
        "a:off",
        &[("x", x.to_string().as_str()), ("y", y.to_string().as_str())],
    )?;
    xml.empty(
        "a:ext",
        &[("cx", cx.to_string().as_str()), ("cy", cy.to_string().as_str())],
    )?;
    xml.end(tag)
}

/// Title placeholder shape. `frame` is only given on the master; layouts and
/// slides inherit the position.
fn write_title_placeholder(
    xml: &mut XmlBuilder,
    id: usize,
    name: &str,
    frame: Option<(Emu, Emu, Emu, Emu)>,
    text: Option<&str>,
) -> Result<()> {
    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.to_string().as_str()), ("name", name)])?;
    xml.start("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.end("p:cNvSpPr")?;
    xml.start("p:nvPr", &[])?;
    xml.empty("p:ph", &[("type", "title")])?;
    xml.end("p:nvPr")?;
    xml.end("p:nvSpPr")?;

    match frame {
        Some((x, y, cx, cy)) => {
            xml.start("p:spPr", &[])?;
            write_xfrm(xml, "a:xfrm", x, y, cx, cy)?;
            xml.start("a:prstGeom", &[("prst", "rect")])?;
            xml.empty("a:avLst", &[])?;
            xml.end("a:prstGeom")?;
            xml.end("p:spPr")?;
        }
        None => xml.empty("p:spPr", &[])?,
    }

    xml.start("p:txBody", &[])?;
    if frame.is_some() {
        xml.empty("a:bodyPr", &[("vert", "horz"), ("anchor", "ctr")])?;
    } else {
        xml.empty("a:bodyPr", &[])?;
    }
    xml.empty("a:lstStyle", &[])?;
    xml.start("a:p", &[])?;
    match text {
        Some(text) if !text.is_empty() => {
            xml.start("a:r", &[])?;
            xml.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
            xml.text_element("a:t", &[], text)?;
            xml.end("a:r")?;
        }
        _ => xml.empty("a:endParaRPr", &[("lang", "en-US")])?,
    }
    xml.end("a:p")?;
    xml.end("p:txBody")?;
    xml.end("p:sp")
}

fn write_level_style(xml: &mut XmlBuilder, tag: &str, size: &str, font: &str) -> Result<()> {
    xml.start(tag, &[])?;
    xml.start("a:lvl1pPr", &[("algn", "l")])?;
    xml.start("a:defRPr", &[("sz", size), ("kern", "1200")])?;
    xml.start("a:solidFill", &[])?;
    xml.empty("a:schemeClr", &[("val", "tx1")])?;
    xml.end("a:solidFill")?;
    xml.empty("a:latin", &[("typeface", format!("+{}-lt", font).as_str())])?;
    xml.empty("a:ea", &[("typeface", format!("+{}-ea", font).as_str())])?;
    xml.empty("a:cs", &[("typeface", format!("+{}-cs", font).as_str())])?;
    xml.end("a:defRPr")?;
    xml.end("a:lvl1pPr")?;
    xml.end(tag)
}

pub fn slide_master_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldMaster",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    xml.start("p:cSld", &[])?;
    xml.start("p:bg", &[])?;
    xml.start("p:bgRef", &[("idx", "1001")])?;
    xml.empty("a:schemeClr", &[("val", "bg1")])?;
    xml.end("p:bgRef")?;
    xml.end("p:bg")?;
    xml.start("p:spTree", &[])?;
    write_group_header(&mut xml)?;
    write_title_placeholder(&mut xml, 2, "Title Placeholder 1", Some(title_frame(prs)), None)?;
    xml.end("p:spTree")?;
    xml.end("p:cSld")?;

    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;

    xml.start("p:sldLayoutIdLst", &[])?;
    for (i, _) in SlideLayout::ALL.iter().enumerate() {
        xml.empty(
            "p:sldLayoutId",
            &[
                ("id", (FIRST_LAYOUT_ID + i as u64).to_string().as_str()),
                ("r:id", rid(i + 1).as_str()),
            ],
        )?;
    }
    xml.end("p:sldLayoutIdLst")?;

    xml.start("p:txStyles", &[])?;
    write_level_style(&mut xml, "p:titleStyle", "4400", "mj")?;
    write_level_style(&mut xml, "p:bodyStyle", "3200", "mn")?;
    write_level_style(&mut xml, "p:otherStyle", "1800", "mn")?;
    xml.end("p:txStyles")?;

    xml.end("p:sldMaster")?;
    Ok(xml.finish())
}

pub fn slide_master_rels_xml() -> Result<Vec<u8>> {
    let mut rels: Vec<(String, &str, String)> = (1..=SlideLayout::ALL.len())
        .map(|n| {
            (
                rid(n),
                REL_SLIDE_LAYOUT,
                format!("../slideLayouts/slideLayout{}.xml", n),
            )
        })
        .collect();
    rels.push((
        rid(SlideLayout::ALL.len() + 1),
        REL_THEME,
        "../theme/theme1.xml".to_string(),
    ));

    let mut xml = XmlBuilder::new()?;
    write_relationships(&mut xml, &rels)?;
    Ok(xml.finish())
}

pub fn slide_layout_xml(layout: SlideLayout) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", layout.ooxml_type()),
            ("preserve", "1"),
        ],
    )?;
    xml.start("p:cSld", &[("name", layout.name())])?;
    xml.start("p:spTree", &[])?;
    write_group_header(&mut xml)?;
    if layout.has_title() {
        write_title_placeholder(&mut xml, 2, "Title 1", None, None)?;
    }
    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sldLayout")?;
    Ok(xml.finish())
}

pub fn slide_layout_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    write_relationships(
        &mut xml,
        &[(
            rid(1),
            REL_SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml".to_string(),
        )],
    )?;
    Ok(xml.finish())
}

fn write_table(xml: &mut XmlBuilder, table: &TableShape, id: usize) -> Result<()> {
    xml.start("p:graphicFrame", &[])?;
    xml.start("p:nvGraphicFramePr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", id.to_string().as_str()), ("name", table.name.as_str())],
    )?;
    xml.start("p:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noGrp", "1")])?;
    xml.end("p:cNvGraphicFramePr")?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGraphicFramePr")?;
    write_xfrm(xml, "p:xfrm", table.left, table.top, table.width, table.height)?;

    xml.start("a:graphic", &[])?;
    xml.start("a:graphicData", &[("uri", NS_TABLE)])?;
    xml.start("a:tbl", &[])?;

    let flag = |on: bool| if on { "1" } else { "0" };
    xml.start(
        "a:tblPr",
        &[
            ("firstRow", flag(table.format.header_row)),
            ("bandRow", flag(table.format.banded_rows)),
        ],
    )?;
    xml.text_element("a:tableStyleId", &[], DEFAULT_TABLE_STYLE_ID)?;
    xml.end("a:tblPr")?;

    xml.start("a:tblGrid", &[])?;
    for width in &table.column_widths {
        xml.empty("a:gridCol", &[("w", width.to_string().as_str())])?;
    }
    xml.end("a:tblGrid")?;

    // Shapes built by hand can skip TableFormat::validate
    let size = table
        .format
        .font_size
        .centipoints()
        .clamp(*FONT_SIZE_CENTIPOINTS.start(), *FONT_SIZE_CENTIPOINTS.end())
        .to_string();
    for (row, height) in table.cells.iter().zip(&table.row_heights) {
        xml.start("a:tr", &[("h", height.to_string().as_str())])?;
        for text in row {
            xml.start("a:tc", &[])?;
            xml.start("a:txBody", &[])?;
            xml.empty("a:bodyPr", &[])?;
            xml.empty("a:lstStyle", &[])?;
            xml.start("a:p", &[])?;
            if let Some(align) = table.format.alignment {
                xml.empty("a:pPr", &[("algn", align.as_ooxml())])?;
            }
            if text.is_empty() {
                xml.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", size.as_str())])?;
            } else {
                xml.start("a:r", &[])?;
                xml.empty("a:rPr", &[("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")])?;
                xml.text_element("a:t", &[], text)?;
                xml.end("a:r")?;
            }
            xml.end("a:p")?;
            xml.end("a:txBody")?;
            xml.empty("a:tcPr", &[])?;
            xml.end("a:tc")?;
        }
        xml.end("a:tr")?;
    }

    xml.end("a:tbl")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;
    xml.end("p:graphicFrame")
}

pub fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.start("p:cSld", &[])?;
    xml.start("p:spTree", &[])?;
    write_group_header(&mut xml)?;

    // Shape ids start at 2; 1 is the group.
    let mut next_id = 2;
    if slide.layout.has_title() {
        write_title_placeholder(&mut xml, next_id, "Title 1", None, slide.title.as_deref())?;
        next_id += 1;
    }
    for table in &slide.tables {
        write_table(&mut xml, table, next_id)?;
        next_id += 1;
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

pub fn slide_rels_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    write_relationships(
        &mut xml,
        &[(
            rid(1),
            REL_SLIDE_LAYOUT,
            format!(
                "../slideLayouts/slideLayout{}.xml",
                layout_part_number(slide.layout)
            ),
        )],
    )?;
    Ok(xml.finish())
}

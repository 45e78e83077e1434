//! YOLO → VOC → COCO conversion of staged partitions.
//!
//! The VOC stage reads each staged label with its staged image's pixel size
//! and writes one XML document per image. The COCO stage reads those XML
//! documents back and aggregates them into one JSON document per partition.
//! Any parse failure aborts the run.

pub mod report;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PrepError;
use crate::ir::io_coco_json::write_coco_json;
use crate::ir::io_voc_xml::{read_voc_xml, write_voc_xml, VOC_XML_EXTENSION};
use crate::ir::io_yolo::{read_image_dimensions, read_label_file};
use crate::ir::{
    Annotation, ClassCatalog, Dataset, DatasetInfo, Image, ImageId, VocDocument, VocObject,
};
use crate::layout::DatasetLayout;
use crate::progress;
use crate::split::Partition;
use crate::stage::{StagedDataset, StagedPair};

pub use report::{ConversionCounts, ConversionReport};

/// Written VOC document paths per partition, in staging order.
pub type VocPaths = BTreeMap<Partition, Vec<PathBuf>>;

/// Build the VOC document for one staged image/label pair.
pub fn yolo_to_voc_document(
    pair: &StagedPair,
    catalog: &ClassCatalog,
) -> Result<VocDocument, PrepError> {
    let (width, height) = read_image_dimensions(&pair.image)?;
    let mut document = VocDocument::new(file_name_of(&pair.image), width, height);

    for row in read_label_file(&pair.label)? {
        let name = catalog
            .name(row.bbox.class_id)
            .ok_or_else(|| PrepError::ClassIndexOutOfRange {
                path: pair.label.clone(),
                line: row.line,
                class_id: row.bbox.class_id,
                class_count: catalog.len(),
            })?;

        let bbox = row
            .bbox
            .to_pixel(width, height)
            .ok_or_else(|| PrepError::YoloLabelParse {
                path: pair.label.clone(),
                line: row.line,
                message: format!(
                    "box does not fit in pixel coordinates of a {width}x{height} image"
                ),
            })?;
        document.objects.push(VocObject::new(name, bbox));
    }

    Ok(document)
}

/// Convert every staged pair to a VOC XML file under `Annotations/VOC/<P>/`.
pub fn yolo_to_voc(
    staged: &StagedDataset,
    layout: &DatasetLayout,
    catalog: &ClassCatalog,
) -> Result<VocPaths, PrepError> {
    let mut voc_paths = VocPaths::new();

    for partition in Partition::ALL {
        let pairs = staged.get(partition);
        let out_dir = layout.voc(partition);
        let bar = progress::bar(
            pairs.len(),
            format!("Converting files to VOC '{partition}' folder"),
        );

        let mut written = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let document = yolo_to_voc_document(pair, catalog)?;
            let xml_path = out_dir.join(
                Path::new(&file_name_of(&pair.label)).with_extension(VOC_XML_EXTENSION),
            );
            write_voc_xml(&xml_path, &document)?;
            log::debug!(
                "wrote {} ({} object(s))",
                xml_path.display(),
                document.objects.len()
            );
            written.push(xml_path);
            bar.inc(1);
        }
        bar.finish_and_clear();

        log::info!("wrote {} VOC document(s) for {}", written.len(), partition);
        voc_paths.insert(partition, written);
    }

    Ok(voc_paths)
}

/// Aggregate one partition's VOC documents into a COCO dataset.
///
/// Image ids follow input order starting at 0. Every object name must be in
/// the catalog; the category list is always the whole catalog.
pub fn build_aggregate(
    documents: &[(PathBuf, VocDocument)],
    catalog: &ClassCatalog,
    info: &DatasetInfo,
) -> Result<Dataset, PrepError> {
    let mut dataset = Dataset {
        info: info.clone(),
        categories: catalog.categories(),
        ..Default::default()
    };

    for (path, document) in documents {
        let image_id = ImageId::from(dataset.images.len());
        dataset.images.push(Image::new(
            image_id,
            document.filename.clone(),
            document.width,
            document.height,
        ));

        for object in &document.objects {
            let category_id =
                catalog
                    .id_of(&object.name)
                    .ok_or_else(|| PrepError::CatalogMismatch {
                        path: path.clone(),
                        name: object.name.clone(),
                    })?;
            dataset
                .annotations
                .push(Annotation::new(image_id, category_id, object.bbox));
        }
    }

    Ok(dataset)
}

/// Read back each partition's VOC documents and write
/// `Annotations/COCO/<P>/<P>.json`. Empty partitions still get a document.
pub fn voc_to_coco(
    voc_paths: &VocPaths,
    layout: &DatasetLayout,
    catalog: &ClassCatalog,
    info: &DatasetInfo,
) -> Result<ConversionReport, PrepError> {
    let mut report = ConversionReport::default();

    for partition in Partition::ALL {
        let paths = voc_paths.get(&partition).map(Vec::as_slice).unwrap_or(&[]);
        let bar = progress::bar(
            paths.len(),
            format!("Converting files from VOC to COCO '{partition}' folder"),
        );

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push((path.clone(), read_voc_xml(path)?));
            bar.inc(1);
        }
        bar.finish_and_clear();

        let dataset = build_aggregate(&documents, catalog, info)?;
        let coco_path = layout.coco_file(partition);
        write_coco_json(&coco_path, &dataset)?;
        log::info!(
            "wrote {} ({} image(s), {} annotation(s))",
            coco_path.display(),
            dataset.images.len(),
            dataset.annotation_count()
        );

        report.record(
            partition,
            ConversionCounts {
                images: dataset.images.len(),
                categories: dataset.categories.len(),
                annotations: dataset.annotation_count(),
                coco_path: Some(coco_path),
            },
        );
    }

    Ok(report)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

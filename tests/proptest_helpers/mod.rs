#![allow(dead_code)]

use detprep::ir::{PixelBox, VocDocument, VocObject, YoloBox};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_image_dims() -> BoxedStrategy<(u32, u32)> {
    (1u32..=4096, 1u32..=4096).boxed()
}

/// Normalized boxes inside the unit square, as annotation tools emit them.
pub fn arb_yolo_box(class_count: usize) -> BoxedStrategy<YoloBox> {
    (0..class_count, 0.0f64..=1.0, 0.0f64..=1.0)
        .prop_flat_map(|(class_id, cx, cy)| {
            let max_w = 2.0 * cx.min(1.0 - cx);
            let max_h = 2.0 * cy.min(1.0 - cy);
            (
                Just(class_id),
                Just(cx),
                Just(cy),
                0.0f64..=max_w.max(0.0),
                0.0f64..=max_h.max(0.0),
            )
        })
        .prop_map(|(class_id, cx, cy, w, h)| YoloBox {
            class_id,
            cx,
            cy,
            w,
            h,
        })
        .boxed()
}

pub fn arb_pixel_box_within(width: u32, height: u32) -> BoxedStrategy<PixelBox> {
    let (w, h) = (i64::from(width), i64::from(height));
    (0..=w, 0..=h)
        .prop_flat_map(move |(xmin, ymin)| (Just(xmin), Just(ymin), xmin..=w, ymin..=h))
        .prop_map(|(xmin, ymin, xmax, ymax)| PixelBox::from_xyxy(xmin, ymin, xmax, ymax))
        .boxed()
}

pub fn category_name_strategy() -> BoxedStrategy<String> {
    "[a-z][a-z0-9_&<>]{0,8}".boxed()
}

pub fn image_file_name_strategy() -> BoxedStrategy<String> {
    "[0-9]{1,3}_[a-z0-9]{1,10}\\.(png|jpg)".boxed()
}

pub fn arb_voc_document(max_objects: usize) -> BoxedStrategy<VocDocument> {
    (image_file_name_strategy(), arb_image_dims())
        .prop_flat_map(move |(filename, (width, height))| {
            let object = (
                category_name_strategy(),
                arb_pixel_box_within(width, height),
                0u8..=1,
                0u8..=1,
            )
                .prop_map(|(name, bbox, truncated, difficult)| {
                    let mut object = VocObject::new(name, bbox);
                    object.truncated = truncated;
                    object.difficult = difficult;
                    object
                });
            (
                Just(filename),
                Just(width),
                Just(height),
                prop::collection::vec(object, 0..=max_objects),
            )
        })
        .prop_map(|(filename, width, height, objects)| {
            let mut document = VocDocument::new(filename, width, height);
            document.objects = objects;
            document
        })
        .boxed()
}

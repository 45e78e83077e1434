//! Annotation model and format I/O.
//!
//! Three on-disk formats meet here:
//!
//! - YOLO labels ([`io_yolo`]): normalized center boxes, the input format.
//! - Pascal VOC XML ([`io_voc_xml`]): one [`VocDocument`] per image with
//!   absolute integer corners.
//! - COCO JSON ([`io_coco_json`]): one aggregate [`Dataset`] per partition.
//!
//! The [`ClassCatalog`] ties them together: a YOLO class index, a VOC object
//! name and a COCO category id all resolve through it.
//!
//! # Example
//!
//! ```
//! use detprep::ir::{ClassCatalog, VocDocument, VocObject, YoloBox};
//!
//! let catalog = ClassCatalog::from_names(["cat", "dog"]).unwrap();
//! let row = YoloBox { class_id: 1, cx: 0.5, cy: 0.5, w: 0.4, h: 0.6 };
//!
//! let mut doc = VocDocument::new("0_img.png", 200, 100);
//! doc.objects.push(VocObject::new(
//!     catalog.name(row.class_id).unwrap(),
//!     row.to_pixel(doc.width, doc.height).unwrap(),
//! ));
//! assert_eq!(doc.objects[0].bbox.xmin, 60);
//! ```

mod bbox;
mod catalog;
mod ids;
pub mod io_coco_json;
pub mod io_voc_xml;
pub mod io_yolo;
mod model;

pub use bbox::{PixelBox, YoloBox};
pub use catalog::ClassCatalog;
pub use ids::{CategoryId, ImageId};
pub use model::{Annotation, Category, Dataset, DatasetInfo, Image, VocDocument, VocObject};

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use transkribus_iiif::iiif::image_info::{ImageApiVersion, ImageInfo, ImageInfoSource};
use transkribus_iiif::resolve::{EntityInfo, EntityLookup, LookupError};
use transkribus_iiif::ConvertError;

pub const PREFIX: &str = "https://example.org/manifests/diaries/";
pub const IMAGE_BASE: &str = "https://images.example.org/iiif";

/// Two-region page with person, place and date tags on the first line.
pub const PAGE_0001: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15">
  <Metadata><Creator>Transkribus</Creator></Metadata>
  <Page imageFilename="0001.jpg" imageWidth="2000" imageHeight="3000">
    <TextRegion id="r1" type="paragraph" custom="readingOrder {index:0;}">
      <Coords points="100,100 1900,100 1900,800 100,800"/>
      <TextLine id="r1l1" custom="readingOrder {index:0;} person {offset:0; length:3;} place {offset:15; length:9; wikiData:Q727;} date {offset:25; length:10; yyyy-mm-dd:1944-05-06;}">
        <Coords points="120,120 1880,120 1880,180 120,180"/>
        <TextEquiv><Unicode>Jan loopt naar Amsterdam 6 mei 1944</Unicode></TextEquiv>
      </TextLine>
      <TextLine id="r1l2" custom="readingOrder {index:1;}">
        <Coords points="120,200 2100,200 2100,260 120,260"/>
        <TextEquiv><Unicode>tot aan de rand</Unicode></TextEquiv>
      </TextLine>
    </TextRegion>
    <TextRegion id="r2" custom="readingOrder {index:1;} structure {type:marginalia;}">
      <Coords points="1950,900 1990,900 1990,1200"/>
      <TextLine id="r2l1" custom="readingOrder {index:0;}">
        <Coords points="1955,905 1985,905 1985,1000 1955,1000"/>
      </TextLine>
    </TextRegion>
  </Page>
</PcGts>
"#;

/// Page whose image is not listed in the diary index.
pub const PAGE_0099: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts>
  <Page imageFilename="0099.jpg" imageWidth="1000" imageHeight="1000">
    <TextRegion id="r1" type="heading">
      <Coords points="0,0 100,0 100,100 0,100"/>
      <TextLine id="r1l1" custom="organization {offset:0; length:5;}">
        <Coords points="0,0 100,0 100,20 0,20"/>
        <TextEquiv><Unicode>Raad van State</Unicode></TextEquiv>
      </TextLine>
    </TextRegion>
  </Page>
</PcGts>
"#;

pub fn info_url(stem: &str) -> String {
    format!("{IMAGE_BASE}/{stem}.jpg/info.json")
}

/// Image server answering every request with the same size.
pub struct FixedImages {
    pub width: u32,
    pub height: u32,
    pub requests: RefCell<Vec<String>>,
}

impl FixedImages {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl ImageInfoSource for FixedImages {
    fn image_info(&self, url: &str) -> Result<ImageInfo, ConvertError> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(ImageInfo {
            service_id: url.trim_end_matches("/info.json").to_string(),
            width: self.width,
            height: self.height,
            version: ImageApiVersion::V3,
            profile: "level1".to_string(),
        })
    }
}

/// Entity lookup with a fixed table; unknown URIs fail.
pub struct TableLookup {
    pub entries: BTreeMap<String, EntityInfo>,
    pub calls: RefCell<Vec<String>>,
}

impl TableLookup {
    pub fn new(entries: &[(&str, &str, Option<&str>)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(uri, label, description)| {
                    (
                        uri.to_string(),
                        EntityInfo::new(*label, description.map(str::to_string)),
                    )
                })
                .collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl EntityLookup for TableLookup {
    fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError> {
        self.calls.borrow_mut().push(uri.to_string());
        self.entries
            .get(uri)
            .cloned()
            .ok_or_else(|| LookupError::NoResults {
                uri: uri.to_string(),
            })
    }
}

/// Input tree for one run, rooted in a temp dir.
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        fs::create_dir_all(root.join("data/diaries")).expect("create data dir");
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn diaries_file(&self) -> PathBuf {
        self.root.join("data/diaries.json")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data/diaries")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("manifests/diaries")
    }

    /// Write the diary index; each diary lists its image stems.
    pub fn write_index(&self, diaries: &[(&str, Vec<&str>)]) {
        let entries: Vec<serde_json::Value> = diaries
            .iter()
            .map(|(id, stems)| {
                serde_json::json!({
                    "id": id,
                    "images": stems.iter().map(|stem| info_url(stem)).collect::<Vec<_>>(),
                })
            })
            .collect();
        fs::write(
            self.diaries_file(),
            serde_json::to_string_pretty(&entries).expect("serialize index"),
        )
        .expect("write index");
    }

    pub fn write_page(&self, diary: &str, file_name: &str, xml: &str) {
        let dir = self.data_dir().join(diary);
        fs::create_dir_all(&dir).expect("create diary dir");
        fs::write(dir.join(file_name), xml).expect("write page xml");
    }

    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let path = self.output_dir().join(relative);
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
        serde_json::from_str(&text).expect("parse output json")
    }
}

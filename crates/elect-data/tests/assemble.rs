//! End-to-end assembly from a data repository on disk.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use elect_core::{Config, SchemaError};
use elect_data::{Assembler, DataError, SourceDocument};

struct Repo {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Repo {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("pre_data")).unwrap();
        fs::create_dir_all(root.join("i18n/auto")).unwrap();
        Self { _dir: dir, root }
    }

    fn write(&self, path: &str, text: &str) -> &Self {
        fs::write(self.root.join(path), text).unwrap();
        self
    }

    fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn minimal_repo() -> Repo {
    let repo = Repo::new();
    repo.write(
        "i18n/auto/en.yaml",
        "texts:\n  office_mayor: {en: Mayor}\n  category_city: {en: City/County}\n",
    )
    .write(
        "i18n/auto/es.yaml",
        "texts:\n  office_mayor: {es: Alcalde}\n",
    )
    .write(
        "pre_data/categories.yaml",
        "_meta: {_type: manual}\ncategories:\n  category_city_county: {name_i18n: category_city}\n",
    )
    .write(
        "pre_data/bodies.yaml",
        "_meta: {_type: manual}\nbodies:\n  sf_bos:\n    name: Board of Supervisors\n    category_id: category_city_county\n",
    )
    .write(
        "pre_data/offices.yaml",
        "_meta: {_type: manual}\noffices:\n  mayor:\n    name_i18n: office_mayor\n    category_id: category_city_county\n",
    );
    repo
}

fn config(root: &Utf8Path) -> Config {
    let mut config = Config::default();
    config.paths.root = root.to_owned();
    config.assembly.sources = ["categories", "bodies", "offices"]
        .map(str::to_owned)
        .to_vec();
    config.assembly.category_order = vec!["category_city_county".to_owned()];
    config
}

#[test]
fn test_minimal_repository() {
    let repo = minimal_repo();
    let config = config(repo.root());

    let source = SourceDocument::build(&config).unwrap();
    let doc = Assembler::new(&config.assembly, 2023)
        .assemble(source)
        .unwrap();

    assert_eq!(doc.bodies_count, 1);
    assert_eq!(doc.office_count, 1);
    assert_eq!(doc.categories[0].name, "City/County");
    assert_eq!(doc.districts.len(), 5);
    insta::assert_json_snapshot!(doc.offices_by_category, @r#"
    {
      "category_city_county": [
        {
          "category_id": "category_city_county",
          "election_info": [],
          "id": "mayor",
          "name": "Mayor",
          "name_i18n": {
            "en": "Mayor",
            "es": "Alcalde"
          },
          "seat_count": 1,
          "twitter": null,
          "url": null
        }
      ]
    }
    "#);
}

#[test]
fn test_unknown_category() {
    let repo = minimal_repo();
    repo.write(
        "pre_data/bodies.yaml",
        "_meta: {_type: manual}\nbodies:\n  moon_council:\n    name: Moon Council\n    category_id: category_moon\n",
    );
    let config = config(repo.root());

    let source = SourceDocument::build(&config).unwrap();
    let err = Assembler::new(&config.assembly, 2023)
        .assemble(source)
        .unwrap_err();

    assert!(err.is_schema_error());
    assert!(matches!(
        err,
        DataError::Schema(SchemaError::UnknownCategories(ref ids)) if ids == &["category_moon"]
    ));
}

#[test]
fn test_source_document_json_is_stable() {
    let repo = minimal_repo();
    let config = config(repo.root());

    let first = SourceDocument::build(&config).unwrap().to_json_pretty().unwrap();
    let second = SourceDocument::build(&config).unwrap().to_json_pretty().unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("{\n    \"bodies\": {"));
    assert!(!first.contains("_meta"));
}

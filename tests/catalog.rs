//! Catalog properties checked through the public library API.

use std::fs;

use price_machine::config::Config;
use price_machine::{CatalogAggregator, Record};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) {
    fs::write(dir.path().join(name), body).unwrap();
}

#[test]
fn two_supplier_files_merge_and_rank() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "price_a.csv", "наименование,цена,вес\nСахар,60,2\n");
    write(&tmp, "price_b.csv", "товар,розница,масса\nМука,40,2\n");

    let mut catalog = CatalogAggregator::new(&Config::default());
    catalog.load(tmp.path()).unwrap();

    let got: Vec<(&str, f64, usize)> = catalog
        .records()
        .iter()
        .map(|r| (r.product(), r.unit_price(), r.rank()))
        .collect();
    assert_eq!(got, vec![("Мука", 20.0, 1), ("Сахар", 30.0, 2)]);
}

#[test]
fn corrupt_file_does_not_blank_others() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "price_good.csv", "товар,цена,вес\nМука,40,2\nСоль,12,1\n");
    fs::write(tmp.path().join("price_corrupt.csv"), [0xC3u8, 0x28, b'\n', b'1']).unwrap();

    let mut catalog = CatalogAggregator::new(&Config::default());
    let summary = catalog.load(tmp.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(summary.files_failed.len(), 1);
}

#[test]
fn reload_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "price_a.csv", "товар,цена,вес\nA,5,1\nB,5,1\nC,1,1\n");
    write(&tmp, "price_b.csv", "товар,цена,вес\nD,5,1\n");

    let mut catalog = CatalogAggregator::new(&Config::default());
    catalog.load(tmp.path()).unwrap();
    let first: Vec<Record> = catalog.records().to_vec();
    catalog.load(tmp.path()).unwrap();
    assert_eq!(catalog.records(), first.as_slice());

    let ranks: Vec<usize> = catalog.records().iter().map(Record::rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn aggregators_are_independent() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    write(&a, "price.csv", "товар,цена,вес\nA,1,1\n");
    write(&b, "price.csv", "товар,цена,вес\nB,1,1\nC,2,1\n");

    let mut first = CatalogAggregator::new(&Config::default());
    let mut second = CatalogAggregator::new(&Config::default());
    first.load(a.path()).unwrap();
    second.load(b.path()).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
}

#[test]
fn configured_synonyms_are_recognised() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "price_en.csv", "Item,Cost,Kg\nRice,90,1\n");

    let mut config = Config::default();
    config.synonyms.product.push("item".to_string());
    config.synonyms.price.push("cost".to_string());
    config.synonyms.weight.push("kg".to_string());

    let mut catalog = CatalogAggregator::new(&config);
    catalog.load(tmp.path()).unwrap();
    assert_eq!(catalog.search("rice").len(), 1);
}

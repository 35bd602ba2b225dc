use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use ufpanel_ingest::{
    IngestError, NormalizeOptions, ReadOptions, load_coded_file, load_named_file,
};
use ufpanel_model::{LongRecord, NamedRecord};

/// Encodes text as Latin-1, the way TabNet exports arrive.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("latin-1 char"))
        .collect()
}

fn write_latin1(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, latin1(text)).expect("write fixture");
    path
}

const DOMESTIC: &str = "Ministério da Saúde - Sistema de Informação de Agravos de Notificação\n\
Notificações por UF de notificação e Ano\n\
Violência doméstica: Sim\n\
Período: 2010-2011\n\
\n\
\"UF de notificação\";\"2010\";\"2011\";\"Total\"\n\
\"11 Rondônia\";\"12\";\"-\";\"12\"\n\
\"12 Acre\";\"-\";\"7\";\"7\"\n\
\"Total\";\"12\";\"7\";\"19\"\n\
\"Fonte: Ministério da Saúde/SVS - SINAN\"\n\
\"Notas:\"\n";

#[test]
fn loads_domestic_export() {
    let dir = TempDir::new().unwrap();
    let path = write_latin1(&dir, "domestica.csv", DOMESTIC);
    let options = NormalizeOptions::new(ReadOptions::latin1(5));

    let records = load_coded_file(&path, &options).expect("normalize");

    assert_eq!(
        records,
        vec![
            LongRecord::new("Rondônia", 11, 2010, 12),
            LongRecord::new("Rondônia", 11, 2011, 0),
            LongRecord::new("Acre", 12, 2010, 0),
            LongRecord::new("Acre", 12, 2011, 7),
        ]
    );
}

#[test]
fn loads_suicide_export() {
    let dir = TempDir::new().unwrap();
    let text = "Ministério da Saúde - SIM\n\
Óbitos p/Residênc por Região/Unidade da Federação e Ano do Óbito\n\
Grande Grupo CID10: X60-X84 Lesões autoprovocadas voluntariamente\n\
Período: 2009-2023\n\
\"Região/Unidade da Federação\";\"2010\";\"2022\";\"2023\";\"Total\"\n\
\"1 Região Norte\";\"100\";\"1\";\"1\";\"102\"\n\
\".. Rondônia\";\"69\";\"1\";\"1\";\"71\"\n\
\".. Acre\";\"31\";\"-\";\"-\";\"31\"\n\
\"Total\";\"100\";\"1\";\"1\";\"102\"\n\
\"Fonte: MS/SVS/CGIAE - Sistema de Informações sobre Mortalidade - SIM\"\n";
    let path = write_latin1(&dir, "suicidios.csv", text);
    let options = NormalizeOptions::new(ReadOptions::latin1(4)).excluding_years([2022, 2023]);

    let records = load_named_file(&path, &options).expect("normalize");

    assert_eq!(
        records,
        vec![
            NamedRecord::new("Rondônia", 2010, 69),
            NamedRecord::new("Acre", 2010, 31),
        ]
    );
}

#[test]
fn rejects_file_with_wider_rows_than_header() {
    let dir = TempDir::new().unwrap();
    let text = "a\nb\nc\nd\n\"UF\";\"2010\"\n\"12 Acre\";\"1\";\"2\"\n";
    let path = write_latin1(&dir, "broken.csv", text);
    let options = NormalizeOptions::new(ReadOptions::latin1(4));

    let result = load_coded_file(&path, &options);

    assert!(matches!(result, Err(IngestError::RaggedRow { .. })));
}

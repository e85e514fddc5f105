// Delimited exports. The gene table carries a UTF-8 byte-order mark so
// spreadsheet tools keep the non-ASCII role glyphs intact.

use crate::analyze::EnrichmentReport;
use crate::analyze::enrichment::neg_log10;
use crate::error::ExportError;
use crate::pipeline::PathwayReport;
use crate::types::ScoredGene;

use super::traits::Renderer;

pub const UTF8_BOM: char = '\u{feff}';

pub const GENE_HEADER: [&str; 6] = ["id", "symbol", "description", "role", "lit_score", "priority"];

pub const ENRICHMENT_HEADER: [&str; 7] = [
    "mechanism",
    "overlap_count",
    "background_count",
    "raw_p",
    "adj_p",
    "fold_enrichment",
    "neg_log10_adj_p",
];

/// Gene table as CSV, prefixed with a BOM. Rows are written in the order given.
pub fn genes_to_csv<'a>(
    genes: impl IntoIterator<Item = &'a ScoredGene>,
    decorate_roles: bool,
) -> crate::error::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(GENE_HEADER).map_err(ExportError::from)?;
    for gene in genes {
        let role = if decorate_roles {
            gene.role().decorated()
        } else {
            gene.role().display_name().to_string()
        };
        writer
            .write_record([
                gene.id(),
                gene.symbol(),
                gene.description(),
                role.as_str(),
                format!("{:.1}", gene.lit_score).as_str(),
                format!("{:.2}", gene.priority).as_str(),
            ])
            .map_err(ExportError::from)?;
    }
    let body = finish(writer)?;
    Ok(format!("{UTF8_BOM}{body}"))
}

/// Enrichment rows as CSV. p-values are written unrounded; only the
/// `-log10` column uses the floor.
pub fn enrichment_to_csv(report: &EnrichmentReport, p_floor: f64) -> crate::error::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(ENRICHMENT_HEADER)
        .map_err(ExportError::from)?;
    for row in &report.rows {
        writer
            .write_record([
                row.mechanism.as_str().to_string(),
                row.overlap_count.to_string(),
                row.background_count.to_string(),
                row.raw_p.to_string(),
                row.adj_p.to_string(),
                format!("{:.4}", row.fold_enrichment),
                format!("{:.4}", neg_log10(row.adj_p, p_floor)),
            ])
            .map_err(ExportError::from)?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> crate::error::Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))?;
    Ok(text)
}

/// `genes.csv`, in priority order.
#[derive(Debug, Clone)]
pub struct GeneCsv {
    pub decorate_roles: bool,
}

impl Renderer for GeneCsv {
    fn name(&self) -> &'static str {
        "gene-csv"
    }

    fn file_name(&self) -> &'static str {
        "genes.csv"
    }

    fn render(&self, report: &PathwayReport) -> crate::error::Result<String> {
        genes_to_csv(report.genes.ranked(), self.decorate_roles)
    }
}

/// `enrichment.csv`.
#[derive(Debug, Clone)]
pub struct EnrichmentCsv {
    pub p_floor: f64,
}

impl Renderer for EnrichmentCsv {
    fn name(&self) -> &'static str {
        "enrichment-csv"
    }

    fn file_name(&self) -> &'static str {
        "enrichment.csv"
    }

    fn render(&self, report: &PathwayReport) -> crate::error::Result<String> {
        enrichment_to_csv(&report.enrichment, self.p_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn gene_csv_has_bom_header_and_glyphs() {
        let report = fixtures::report();
        let out = GeneCsv {
            decorate_roles: true,
        }
        .render(&report)
        .unwrap();
        assert!(out.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]));
        insta::assert_snapshot!(out.trim_start_matches(UTF8_BOM), @r#"
        id,symbol,description,role,lit_score,priority
        3064,HTT,huntingtin,★ Core Gene,95.0,98.00
        627,BDNF,"brain derived neurotrophic factor, synaptic",⚠ Synaptic Excitotoxicity,95.0,68.00
        836,CASP3,caspase 3,✝ Apoptosis,95.0,68.00
        7157,TP53,tumor protein p53,• Pathway Component,95.0,68.00
        "#);
    }

    #[test]
    fn undecorated_roles_are_plain_names() {
        let report = fixtures::report();
        let out = genes_to_csv(report.genes.rows(), false).unwrap();
        assert!(out.contains(",Core Gene,"));
        assert!(!out.contains('★'));
    }

    #[test]
    fn csv_reads_back_through_csv_reader() {
        let report = fixtures::report();
        let out = genes_to_csv(report.genes.rows(), true).unwrap();
        let mut reader = csv::Reader::from_reader(out.trim_start_matches(UTF8_BOM).as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), GENE_HEADER);
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[1][2], "brain derived neurotrophic factor, synaptic");
    }

    #[test]
    fn enrichment_csv_has_log_column() {
        let report = fixtures::report();
        let out = EnrichmentCsv { p_floor: 1e-10 }.render(&report).unwrap();
        insta::assert_snapshot!(out, @r"
        mechanism,overlap_count,background_count,raw_p,adj_p,fold_enrichment,neg_log10_adj_p
        CoreGene,1,1,1,1,1.0000,0.0000
        Apoptosis,1,1,1,1,1.0000,0.0000
        SynapticExcitotoxicity,1,1,1,1,1.0000,0.0000
        ");
    }
}

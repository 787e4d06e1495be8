//! Canned invoice texts for trying the pipeline without real documents.

use std::path::Path;

use tracing::info;

use super::{Result, TextProducer};

const DEMO_INVOICE: &str = "\
Beispiel GmbH
Musterstraße 123
12345 Musterstadt

Rechnungsnummer: R-2023-1234
Rechnungsdatum: 15.02.2023

Pos.  Bezeichnung                  Anzahl     Einzelpreis     Gesamtpreis
----------------------------------------------------------------------------
1     Premium Service                1         199,00 €        199,00 €
2     Zusatzleistung                 2          45,00 €         90,00 €

Zwischensumme:                                                 289,00 €
MwSt. 19%:                                                      54,91 €
Gesamtbetrag:                                                  343,91 €
";

const DEMO_RECEIPT: &str = "\
Einzelhandel KG
Hauptstraße 78
10559 Berlin

Quittung Nr.: Q-5678
Datum: 10.02.2023
Kunde: Barzahler

Artikel                                      Preis
---------------------------------------------------
Bürobedarf                                 45,75 €
Fachliteratur                              28,99 €
---------------------------------------------------
Gesamtbetrag                               74,74 €

Vielen Dank für Ihren Einkauf!
";

/// Returns a demo invoice for file names containing `rechnung`, a demo receipt otherwise.
///
/// The file itself is never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoTextProducer;

impl DemoTextProducer {
    pub fn new() -> Self {
        Self
    }
}

impl TextProducer for DemoTextProducer {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn produce(&self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        info!("Using demo text for {}", path.display());

        if file_name.contains("rechnung") {
            Ok(DEMO_INVOICE.to_string())
        } else {
            Ok(DEMO_RECEIPT.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_for_rechnung_files() {
        let text = DemoTextProducer::new()
            .produce(Path::new("/tmp/Rechnung_2023.pdf"))
            .unwrap();
        assert!(text.starts_with("Beispiel GmbH"));
    }

    #[test]
    fn test_receipt_otherwise() {
        let text = DemoTextProducer::new()
            .produce(Path::new("/tmp/quittung.pdf"))
            .unwrap();
        assert!(text.starts_with("Einzelhandel KG"));
    }
}

//! Invoice fixtures shared by the extraction tests.

/// Raw text laid out the way the PDF text layer renders a multi-utility
/// invoice: numbers of adjacent columns run together without separators.
pub(crate) const INVOICE_TEXT: &str = "Jönköping Energi AB\n\
Faktura-nr: 7712345 Fakturadatum 2024-02-05 Förfallodatum 2024-02-29\n\
Mätpunkt 735999 Förbrukning 1234,00 kWh\n\
ELNÄT\n\
Fast avgift enkeltariff 1,00 mån312,50 312,50\n\
Överföring enkeltariff 1234,0045,67 563,57\n\
Energiskatt 1234,0053,50 660,19\n\
TOTALT BELOPP ELNÄT inkl moms 1536,26 kr\n\
ELHANDEL\n\
Fast avgift kr/mån 1,00 st Fast avgift 1,0039,00 39,00\n\
Rörligt månadspris 1234,0084,62 1044,21\n\
ELHANDEL 1131,34 kr\n\
FJÄRRVÄRME\n\
1,25 MWh 31 dgr kr/år krFast Avgift 1,004 200,00 350,00\n\
kr/MWh krEnergiavgift 1,25780,00 975,00\n\
FJÄRRVÄRME 1 325,00 kr\n\
Serviceavgift villa 1,0099,00 99,00\n";

pub(crate) const NETWORK_TABLE: &str = r#"
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Fast avgift enkeltariff</td><td>1,00</td><td>312,50</td><td>312,50</td></tr>
  <tr><td>Överföring enkeltariff</td><td>1 234,00</td><td>45,67</td><td>563,57</td></tr>
  <tr><td>Energiskatt</td><td>1 234,00</td><td>53,50</td><td>660,19</td></tr>
  <tr><td>TOTALT BELOPP kWh</td><td></td><td></td><td>1 536,26</td></tr>
</table>"#;

pub(crate) const TRADE_TABLE: &str = r#"
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Medelspotpris</td><td>1 234,00</td><td>80,12</td><td>988,68</td></tr>
  <tr><td>Rörliga kostnader</td><td>1 234,00</td><td>4,50</td><td>55,53</td></tr>
  <tr><td>Fasta påslag</td><td>1 234,00</td><td>3,90</td><td>48,13</td></tr>
  <tr><td>Fast avgift</td><td>1,00</td><td>39,00</td><td>39,00</td></tr>
  <tr><td>TOTALT BELOPP kWh</td><td></td><td></td><td>1 131,34</td></tr>
</table>"#;

pub(crate) const HEATING_TABLE: &str = r#"
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Fast Avgift</td><td>1,00</td><td>4 200,00</td><td>350,00</td></tr>
  <tr><td>Energiavgift</td><td>1,25</td><td>780,00</td><td>975,00</td></tr>
  <tr><td>TOTALT BELOPP MWh</td><td></td><td></td><td>1 325,00</td></tr>
</table>"#;

pub(crate) const CITY_NETWORK_TABLE: &str = r#"
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Serviceavgift villa</td><td>1,00</td><td>99,00</td><td>99,00</td></tr>
  <tr><td>TOTALT BELOPP</td><td></td><td></td><td>99,00</td></tr>
</table>"#;

const HEADER: &str = r#"
<h2>2024-02-01 FAKTURA</h2>
<p>Fakturanummer</p>
<p>123456</p>"#;

/// Rendered layout with the invoice header and the given tables.
pub(crate) fn layout_html(tables: &[&str]) -> String {
    format!("<html><body>{}{}</body></html>", HEADER, tables.concat())
}

/// Rendered layout of a complete invoice.
pub(crate) fn invoice_html() -> String {
    layout_html(&[NETWORK_TABLE, TRADE_TABLE, HEATING_TABLE, CITY_NETWORK_TABLE])
}

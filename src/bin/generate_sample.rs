use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_scan(
    wavelengths: &[f64],
    peaks: &[(f64, f64, f64)],
    offset: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp))
                .sum();
            offset + signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn csv_line(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn wavelength_line(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.1}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Which way a block carries its dark and white references.
enum Reference {
    Shared(Vec<f64>),
    List(Vec<Vec<f64>>),
    Missing,
}

fn write_reference(xml: &mut String, shared: &str, list: &str, reference: &Reference) -> Result<()> {
    match reference {
        Reference::Shared(scan) => {
            writeln!(xml, "    <{shared}>{}</{shared}>", csv_line(scan))?;
        }
        Reference::List(scans) => {
            writeln!(xml, "    <{list}>")?;
            for scan in scans {
                writeln!(xml, "      <string>{}</string>", csv_line(scan))?;
            }
            writeln!(xml, "    </{list}>")?;
        }
        Reference::Missing => {}
    }
    Ok(())
}

struct BlockSpec<'a> {
    element: &'a str,
    serial: &'a str,
    reads: Vec<Vec<f64>>,
    dark: Reference,
    white: Reference,
}

fn write_block(xml: &mut String, wavelengths: &[f64], block: &BlockSpec<'_>) -> Result<()> {
    let tag = block.element;
    writeln!(xml, "  <{tag}>")?;
    writeln!(xml, "    <SerialNumber>{}</SerialNumber>", block.serial)?;
    writeln!(xml, "    <IntegrationTime>100</IntegrationTime>")?;
    writeln!(xml, "    <Pixels>{}</Pixels>", wavelengths.len())?;
    writeln!(xml, "    <NumberOfScans>{}</NumberOfScans>", block.reads.len())?;
    writeln!(xml, "    <WavelengthsCsv>{}</WavelengthsCsv>", wavelength_line(wavelengths))?;
    writeln!(xml, "    <IntensitiesListCsv>")?;
    for scan in &block.reads {
        writeln!(xml, "      <string>{}</string>", csv_line(scan))?;
    }
    writeln!(xml, "    </IntensitiesListCsv>")?;
    write_reference(xml, "DarkCsv", "DarkListCsv", &block.dark)?;
    write_reference(xml, "WhiteCsv", "WhiteListCsv", &block.white)?;
    writeln!(xml, "    <ExperimentRecordedStr>2024-03-01 10:15:00</ExperimentRecordedStr>")?;
    writeln!(xml, "    <DarkRecordedStr>2024-03-01 10:05:00</DarkRecordedStr>")?;
    writeln!(xml, "    <WhiteRecordedStr>2024-03-01 10:10:00</WhiteRecordedStr>")?;
    writeln!(xml, "    <LiquidTemperature>21.5</LiquidTemperature>")?;
    writeln!(xml, "    <XSmooth>2</XSmooth>")?;
    writeln!(xml, "    <IsTemperatureCompensated>true</IsTemperatureCompensated>")?;
    writeln!(xml, "    <ScansToAverage>{}</ScansToAverage>", block.reads.len())?;
    writeln!(xml, "  </{tag}>")?;
    Ok(())
}

fn drink_xml(
    wavelengths: &[f64],
    reflectance: &BlockSpec<'_>,
    transmission: &BlockSpec<'_>,
) -> Result<String> {
    let mut xml = String::new();
    writeln!(xml, "<Drink>")?;
    writeln!(xml, "  <Name>Sample Cola</Name>")?;
    writeln!(xml, "  <DrinkIdStr>GS-000042</DrinkIdStr>")?;
    writeln!(xml, "  <Category1>Soft Drink</Category1>")?;
    writeln!(xml, "  <Category2>Cola</Category2>")?;
    writeln!(xml, "  <Details>")?;
    writeln!(
        xml,
        "    <Detail><Key><string>Ean</string></Key><Value><string>5000112637922</string></Value></Detail>"
    )?;
    writeln!(
        xml,
        "    <Detail><Key><string>Volume</string></Key><Value><string>330ml</string></Value></Detail>"
    )?;
    writeln!(xml, "  </Details>")?;
    write_block(&mut xml, wavelengths, reflectance)?;
    write_block(&mut xml, wavelengths, transmission)?;
    writeln!(xml, "</Drink>")?;
    Ok(xml)
}

const CATEGORY_XML: &str = r#"<Categories>
  <First>
    <Category Name="Soft Drink"><Guid>6f1c2a4e-0001-4c1b-9a55-1f2e3d4c5b6a</Guid></Category>
    <Category Name="Juice"><Guid>6f1c2a4e-0002-4c1b-9a55-1f2e3d4c5b6a</Guid></Category>
  </First>
  <Second>
    <Category Name="Cola"><Guid>8a7b6c5d-0001-4e3f-8a1b-2c3d4e5f6a7b</Guid></Category>
  </Second>
  <Third>
    <Category Name="Diet"><Guid>9b8c7d6e-0001-4f2a-9b3c-4d5e6f7a8b9c</Guid></Category>
  </Third>
</Categories>
"#;

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let mut rng = SimpleRng::new(42);

    // Wavelengths: 400 → 796 nm, step 4
    let wavelengths: Vec<f64> = (0..100).map(|i| 400.0 + i as f64 * 4.0).collect();
    let peaks = [(480.0, 25.0, 0.6), (620.0, 40.0, 0.9), (730.0, 20.0, 0.3)];

    let mut scans = |count: usize, offset: f64, peaks: &[(f64, f64, f64)], noise: f64| -> Vec<Vec<f64>> {
        (0..count)
            .map(|_| generate_scan(&wavelengths, peaks, offset, noise, &mut rng))
            .collect()
    };

    let reflectance = BlockSpec {
        element: "Reflectance",
        serial: "USB4F01234",
        reads: scans(3, 0.1, &peaks, 0.005),
        dark: Reference::List(scans(4, 0.02, &[], 0.002)),
        white: Reference::Shared(vec![1.0; wavelengths.len()]),
    };
    let transmission = BlockSpec {
        element: "Transmission",
        serial: "USB4F05678",
        reads: scans(2, 0.3, &peaks, 0.01),
        dark: Reference::Missing,
        white: Reference::List(scans(2, 1.0, &[], 0.003)),
    };

    let xml = drink_xml(&wavelengths, &reflectance, &transmission)?;

    let drink_path = out_dir.join("sample_drink.xml");
    std::fs::write(&drink_path, &xml)
        .with_context(|| format!("writing {}", drink_path.display()))?;
    let category_path = out_dir.join("sample_category.xml");
    std::fs::write(&category_path, CATEGORY_XML)
        .with_context(|| format!("writing {}", category_path.display()))?;

    println!(
        "Wrote {} and {} ({} wavelengths, {} observations)",
        drink_path.display(),
        category_path.display(),
        wavelengths.len(),
        reflectance.reads.len() + transmission.reads.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_panda::data::loader::{extract, parse_document, Overrides};

    #[test]
    fn generated_document_round_trips_through_loader() {
        let mut rng = SimpleRng::new(7);
        let wavelengths = [400.0, 500.0, 600.0];
        let reflectance = BlockSpec {
            element: "Reflectance",
            serial: "R-1",
            reads: vec![generate_scan(&wavelengths, &[], 0.1, 0.01, &mut rng); 2],
            dark: Reference::List(vec![vec![0.0, 0.0, 0.0], vec![0.5, 1.0, 1.5]]),
            white: Reference::Shared(vec![1.0; 3]),
        };
        let transmission = BlockSpec {
            element: "Transmission",
            serial: "T-1",
            reads: vec![vec![0.2, 0.3, 0.4]],
            dark: Reference::Missing,
            white: Reference::Missing,
        };

        let xml = drink_xml(&wavelengths, &reflectance, &transmission).unwrap();
        let doc = parse_document(&xml, "generated").unwrap();
        let record = extract(doc.root_element(), Overrides::default()).unwrap();

        assert_eq!(record.upc, "5000112637922");
        let block = record.reflectance.unwrap();
        assert_eq!(block.observation_count(), 2);
        assert_eq!(block.dark.profile, ["0.25", "0.5", "0.75"]);
        assert_eq!(block.white.value(1, 2), Some("1.0000"));
        let block = record.transmission.unwrap();
        assert_eq!(block.dark.profile, ["0", "0", "0"]);
    }
}

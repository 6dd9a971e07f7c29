//! Seeded demo data: the "posts" table of a news-site analytics dashboard.

use chrono::{Duration, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rankboard_common::{Dataset, Row, Value};

use crate::error::IoError;
use crate::traits::DataSource;

pub const CATEGORIES: [&str; 13] = [
    "Cidades",
    "Curiosidades Gerais",
    "Notícias",
    "Saúde/Bem Estar",
    "Carros/Motos",
    "Jardinagem",
    "Filmes/Séries/TV",
    "Astrologia",
    "Esportes",
    "Tecnologia",
    "Economia",
    "Política",
    "Entretenimento",
];

pub const SITES: [&str; 10] = [
    "Em Foco",
    "Terra Br",
    "CB Radar",
    "Uni Not",
    "Tupi FM",
    "G1 Notícias",
    "UOL",
    "R7",
    "Globo",
    "Band",
];

pub const MANAGERS: [&str; 6] = ["Gabriel", "Vanessa", "Núbia", "Guilherme", "Ana", "Carlos"];

const SLUGS: [&str; 6] = [
    "economia/2025/05/03/fim-de-linha-de-almoco-com-nova-lei-trabalhista",
    "noticias/2025/brasil-se-despede-de-fabio-de-mello-aos-61-anos",
    "curiosidades/2025/06/02/grande-rede-de-varejo-falida-fecha-todas-lojas",
    "saude/2025/o-que-significa-quando-lagartixa-estao-aparecendo-em-casa",
    "entretenimento/2025/12-nomes-femininos-vintage-dos-anos-50",
    "tecnologia/2025/05/11/escala-de-trabalho-4x3-foi-aprovada",
];

pub const COLUMNS: [&str; 6] = ["link_post", "categoria", "site", "gerente", "pageviews", "data"];

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_POSTS: usize = 200;

/// Deterministic generator: the same seed, post count and reference date
/// always produce the same dataset on a given platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSource {
    seed: u64,
    posts: usize,
    reference: NaiveDate,
}

impl SampleSource {
    /// Posts dated within the 365 days before `reference`.
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            seed: DEFAULT_SEED,
            posts: DEFAULT_POSTS,
            reference,
        }
    }

    #[cfg(feature = "system-clock")]
    pub fn today() -> Self {
        Self::new(crate::clock::today())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_posts(mut self, posts: usize) -> Self {
        self.posts = posts;
        self
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn generate(&self) -> Dataset {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let rows: Vec<Row> = (0..self.posts)
            .map(|i| {
                let site = pick(&mut rng, &SITES);
                let category = pick(&mut rng, &CATEGORIES);
                let manager = pick(&mut rng, &MANAGERS);
                let slug = pick(&mut rng, &SLUGS);
                let pageviews: i64 = rng.gen_range(100_000..=10_000_000);
                let age = rng.gen_range(1..=365);
                vec![
                    Value::Text(format!("{slug}-{i}")),
                    Value::from(category),
                    Value::from(site),
                    Value::from(manager),
                    Value::Int(pageviews),
                    Value::Date(self.reference - Duration::days(age)),
                ]
            })
            .collect();
        Dataset::from_records(
            rows.into_iter()
                .map(|row| COLUMNS.iter().copied().zip(row)),
        )
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

impl DataSource for SampleSource {
    fn id(&self) -> String {
        format!("sample:{}:{}:{}", self.seed, self.posts, self.reference)
    }

    fn load(&self) -> Result<Dataset, IoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("source_load", source = "sample", posts = self.posts).entered();

        Ok(self.generate())
    }
}

use std::{time::{SystemTime, UNIX_EPOCH}, fs::File, io::Write};

use clap::{Args, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rand_distr::{Uniform, Normal, Distribution};

use crate::error::InstanceError;
use crate::instance::AlpInstance;

/// Serialization used when writing a generated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstanceFormat {
    Json,
    Orlib,
}

#[derive(Debug, Args)]
pub struct AlpGenerator {
    /// An optional seed to kickstart the instance generation
    #[clap(short='s', long)]
    seed: Option<u128>,
    /// The number of aircrafts
    #[clap(short='n', long, default_value="50")]
    nb_aircrafts: usize,
    /// The number of aircraft classes
    #[clap(short='k', long, default_value="4")]
    nb_classes: usize,
    /// The number of clusters of similar classes
    #[clap(short='c', long, default_value="2")]
    nb_clusters: usize,
    /// The minimum separation position used to generate the pairwise minimum separation time
    #[clap(long, default_value="100")]
    min_separation_position: isize,
    /// The maximum separation position used to generate the pairwise minimum separation time
    #[clap(long, default_value="200")]
    max_separation_position: isize,
    /// The std deviation of the separation positions among a cluster
    #[clap(long, default_value="10")]
    separation_position_std_dev: isize,
    /// The separation added between any two distinct aircrafts
    #[clap(long, default_value="3")]
    min_separation: isize,
    /// The average time between two aircraft arrivals
    #[clap(long, default_value="50")]
    avg_interarrival_time: isize,
    /// The largest distance between the earliest and the target landing time
    #[clap(long, default_value="100")]
    max_earliness: isize,
    /// The largest distance between the target and the latest landing time
    #[clap(long, default_value="500")]
    max_lateness: isize,
    /// The largest penalty per time unit for landing before the target
    #[clap(long, default_value="5")]
    max_early_penalty: usize,
    /// The largest penalty per time unit for landing after the target
    #[clap(long, default_value="10")]
    max_late_penalty: usize,
    /// Format of the generated instance
    #[clap(short, long, value_enum, default_value="json")]
    format: InstanceFormat,
    /// Name of the file where to generate the alp instance
    #[clap(short, long)]
    output: Option<String>,
}

impl AlpGenerator {

    pub fn generate(&self) -> Result<(), InstanceError> {
        let instance = self.instance();

        let instance = match self.format {
            InstanceFormat::Json => serde_json::to_string_pretty(&instance)?,
            InstanceFormat::Orlib => instance.to_orlib(),
        };

        if let Some(output) = self.output.as_ref() {
            File::create(output)
                .and_then(|mut file| file.write_all(instance.as_bytes()))
                .map_err(|source| InstanceError::Io { path: output.into(), source })?;
        } else {
            println!("{instance}");
        }
        Ok(())
    }

    pub fn instance(&self) -> AlpInstance {
        let mut rng = seeded_rng(self.seed);
        let nb_clusters = self.nb_clusters.clamp(1, self.nb_classes.max(1));
        let nb_classes = self.nb_classes.max(nb_clusters);

        let mut nb_classes_per_cluster = vec![nb_classes / nb_clusters; nb_clusters];
        for i in 0..(nb_classes % nb_clusters) {
            nb_classes_per_cluster[i] += 1;
        }

        let classes = self.generate_classes(&mut rng, nb_classes);
        let class_separation = self.generate_separation_costs(&mut rng, &nb_classes_per_cluster);
        let separation = self.generate_separation(&classes, &class_separation);
        let target = self.generate_target(&mut rng);
        let earliest = self.generate_earliest(&mut rng, &target);
        let latest = self.generate_latest(&mut rng, &target);
        let appearance = self.generate_appearance(&mut rng, &earliest);
        let early_penalty = self.generate_penalties(&mut rng, self.max_early_penalty);
        let late_penalty = self.generate_penalties(&mut rng, self.max_late_penalty);

        AlpInstance {
            nb_aircrafts: self.nb_aircrafts,
            freeze_time: 0,
            appearance,
            earliest,
            target,
            latest,
            early_penalty,
            late_penalty,
            separation,
        }
    }

    fn generate_separation_costs(&self, rng: &mut impl Rng, nb_classes_per_cluster: &[usize]) -> Vec<Vec<isize>> {
        let nb_clusters = nb_classes_per_cluster.len();
        let nb_classes: usize = nb_classes_per_cluster.iter().sum();

        let mut members = vec![vec![]; nb_clusters];
        let mut t = 0_usize;
        for (i, n) in nb_classes_per_cluster.iter().copied().enumerate() {
            for _ in 0..n {
                members[i].push(t);
                t += 1;
            }
        }

        let mut separation_costs = vec![vec![0; nb_classes]; nb_classes];

        let (low, high) = (self.min_separation_position.min(self.max_separation_position), self.min_separation_position.max(self.max_separation_position));
        let rand_centroid = Uniform::new_inclusive(low, high);

        for a in 0..nb_clusters {
            let positions_a = self.generate_positions(rng, &rand_centroid, nb_classes_per_cluster[a]);

            for b in 0..nb_clusters {
                if a == b {
                    for (i, ti) in members[a].iter().copied().enumerate() {
                        for (j, tj) in members[a].iter().copied().enumerate() {
                            separation_costs[ti][tj] = positions_a[i].abs_diff(positions_a[j]) as isize;
                        }
                    }
                } else {
                    let positions_b = self.generate_positions(rng, &rand_centroid, nb_classes_per_cluster[b]);

                    for (i, ti) in members[a].iter().copied().enumerate() {
                        for (j, tj) in members[b].iter().copied().enumerate() {
                            separation_costs[ti][tj] = positions_a[i].abs_diff(positions_b[j]) as isize;
                        }
                    }
                }
            }
        }

        separation_costs
    }

    fn generate_positions(&self, rng: &mut impl Rng, rand_centroid: &Uniform<isize>, n: usize) -> Vec<isize> {
        let centroid = rand_centroid.sample(rng) as f64;
        let std_dev = self.separation_position_std_dev.max(0) as f64;
        match Normal::new(centroid, std_dev) {
            Ok(normal) => (0..n).map(|_| normal.sample(rng).round() as isize).collect(),
            Err(_) => vec![centroid as isize; n],
        }
    }

    fn generate_separation(&self, classes: &[usize], class_separation: &[Vec<isize>]) -> Vec<Vec<isize>> {
        (0..self.nb_aircrafts)
            .map(|i| {
                (0..self.nb_aircrafts)
                    .map(|j| if i == j { 0 } else { class_separation[classes[i]][classes[j]] + self.min_separation.max(0) })
                    .collect()
            })
            .collect()
    }

    fn generate_classes(&self, rng: &mut impl Rng, nb_classes: usize) -> Vec<usize> {
        let rand_class = Uniform::new(0, nb_classes);
        (0..self.nb_aircrafts).map(|_| rand_class.sample(rng)).collect()
    }

    fn generate_target(&self, rng: &mut impl Rng) -> Vec<isize> {
        let mut target = vec![];

        let rand = Uniform::<f64>::new(f64::EPSILON, 1.0);

        for i in 0..self.nb_aircrafts {
            let base = if i == 0 { self.max_earliness.max(0) } else { target[i - 1] };
            target.push(base + (- rand.sample(rng).ln() * self.avg_interarrival_time as f64).round() as isize);
        }

        target
    }

    fn generate_earliest(&self, rng: &mut impl Rng, target: &[isize]) -> Vec<isize> {
        let rand = Uniform::new_inclusive(0, self.max_earliness.max(0));
        target.iter().map(|t| t - rand.sample(rng)).collect()
    }

    fn generate_latest(&self, rng: &mut impl Rng, target: &[isize]) -> Vec<isize> {
        let rand = Uniform::new_inclusive(0, self.max_lateness.max(0));
        target.iter().map(|t| t + rand.sample(rng)).collect()
    }

    fn generate_appearance(&self, rng: &mut impl Rng, earliest: &[isize]) -> Vec<isize> {
        let rand = Uniform::new_inclusive(0, self.max_earliness.max(0));
        earliest.iter().map(|e| (e - rand.sample(rng)).max(0)).collect()
    }

    fn generate_penalties(&self, rng: &mut impl Rng, max_penalty: usize) -> Vec<f64> {
        let rand = Uniform::new_inclusive(1, max_penalty.max(1));
        (0..self.nb_aircrafts).map(|_| rand.sample(rng) as f64).collect()
    }

}

/// Builds a ChaCha generator from a seed, or from the clock when none is given.
pub fn seeded_rng(seed: Option<u128>) -> ChaChaRng {
    let init = seed.unwrap_or_else(|| SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default());
    let mut seed = [0_u8; 32];
    seed.iter_mut().zip(init.to_be_bytes().into_iter()).for_each(|(s, i)| *s = i);
    seed.iter_mut().rev().zip(init.to_le_bytes().into_iter()).for_each(|(s, i)| *s = i);
    ChaChaRng::from_seed(seed)
}

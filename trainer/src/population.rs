use rand::seq::SliceRandom;
use rand::Rng;
use shared::Brain;
use uuid::Uuid;

/// One controller in the population
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: Uuid,
    pub brain: Brain,

    /// Fitness from the most recent episode
    pub fitness: f64,
}

impl Member {
    fn new(brain: Brain) -> Self {
        Self {
            id: Uuid::new_v4(),
            brain,
            fitness: 0.0,
        }
    }
}

/// Breeding parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub elitism: usize,
    pub survival_threshold: f64,
    pub mutation_rate: f64,
}

/// The evolving set of controllers and the generation counter
#[derive(Debug, Clone)]
pub struct Population {
    pub members: Vec<Member>,
    pub generation: u32,
    selection: Selection,
}

impl Population {
    /// Start from `size` random brains at generation 1
    pub fn new<R: Rng>(size: usize, selection: Selection, rng: &mut R) -> Self {
        let brains = (0..size).map(|_| Brain::random(rng)).collect();
        Self::from_brains(brains, selection)
    }

    /// Start from a given set of brains at generation 1
    pub fn from_brains(brains: Vec<Brain>, selection: Selection) -> Self {
        Self {
            members: brains.into_iter().map(Member::new).collect(),
            generation: 1,
            selection,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn brains(&self) -> Vec<Brain> {
        self.members.iter().map(|m| m.brain.clone()).collect()
    }

    /// Store episode results; `fitness[i]` belongs to `members[i]`
    pub fn record(&mut self, fitness: &[f64]) {
        for (member, fitness) in self.members.iter_mut().zip(fitness) {
            member.fitness = *fitness;
        }
    }

    pub fn best(&self) -> Option<&Member> {
        self.members.iter().max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Replace the population with the next generation.
    ///
    /// Members are ranked by fitness. The top `elitism` carry over unchanged;
    /// the rest are children of two parents drawn from the top
    /// `survival_threshold` fraction, crossed over and then mutated.
    pub fn evolve<R: Rng>(&mut self, rng: &mut R) {
        if self.is_empty() {
            return;
        }
        let size = self.len();

        self.members.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let elites = self.selection.elitism.min(size);
        let breeders =
            ((size as f64 * self.selection.survival_threshold).ceil() as usize).clamp(1, size);
        let parents = &self.members[..breeders];

        let mut next: Vec<Member> = self.members[..elites]
            .iter()
            .map(|m| Member {
                fitness: 0.0,
                ..m.clone()
            })
            .collect();

        while next.len() < size {
            let (Some(a), Some(b)) = (parents.choose(rng), parents.choose(rng)) else {
                break;
            };
            let mut child = a.brain.crossover(&b.brain, rng);
            child.mutate(self.selection.mutation_rate, rng);
            next.push(Member::new(child));
        }

        tracing::debug!(
            generation = self.generation,
            elites,
            breeders,
            "population evolved"
        );

        self.members = next;
        self.generation += 1;
    }
}

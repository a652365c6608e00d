//! Fixed sample tasks for filling an empty list.

/// A title/description pair inserted by `Store::seed_sample_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTask {
    pub title: &'static str,
    pub description: &'static str,
}

/// Sample tasks, in insertion order.
pub const SAMPLE_TASKS: [SampleTask; 5] = [
    SampleTask {
        title: "Faire les courses",
        description: "Acheter du pain, lait et légumes",
    },
    SampleTask {
        title: "Terminer le projet",
        description: "Finaliser l'application de tâches",
    },
    SampleTask {
        title: "Appeler le dentiste",
        description: "Prendre rendez-vous pour un contrôle",
    },
    SampleTask {
        title: "Lire un livre",
        description: "Continuer la lecture du roman en cours",
    },
    SampleTask {
        title: "Faire du sport",
        description: "Séance de cardio 30 minutes",
    },
];

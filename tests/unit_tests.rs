// Unit tests for Lume Pairing

use lume_pairing::core::{
    accepts, assemble, compatible, compute_score_matrix, find_blocking_pairs,
    partition, MatchState, QuestionnaireProfile, RankingBuilder, ScoreMatrix, SideAssignment,
    StableMatcher, QueueDiscipline,
};
use lume_pairing::models::{GenderIdentity, Member, Orientation, ScoringWeights};

#[test]
fn test_compatibility_requires_both_directions() {
    let gay_man = Member::new(0, GenderIdentity::Male, Orientation::PrefersMen);
    let straight_man = Member::new(1, GenderIdentity::Male, Orientation::PrefersWomen);

    assert!(accepts(gay_man.orientation, straight_man.gender_identity));
    assert!(!compatible(&gay_man, &straight_man));
}

#[test]
fn test_compatibility_nonbinary_bisexual_matches_everyone_open_to_them() {
    let enby = Member::new(0, GenderIdentity::NonBinary, Orientation::Bisexual);

    for identity in GenderIdentity::ALL {
        for orientation in Orientation::ALL {
            let other = Member::new(1, identity, orientation);
            assert!(compatible(&enby, &other), "{:?}/{:?}", identity, orientation);
        }
    }
}

#[test]
fn test_partition_is_seeded() {
    let members: Vec<Member> = (0..10)
        .map(|id| Member::new(id, GenderIdentity::Female, Orientation::Bisexual))
        .collect();

    let a = partition(&members, Some(1)).unwrap();
    let b = partition(&members, Some(1)).unwrap();
    assert_eq!(a.proposers(), b.proposers());
    assert_eq!(a.proposers().len(), 5);
    assert_eq!(a.receivers().len(), 5);
}

#[test]
fn test_partition_odd_population() {
    let members: Vec<Member> = (0..7)
        .map(|id| Member::new(id, GenderIdentity::Male, Orientation::PrefersWomen))
        .collect();

    let sides = partition(&members, None).unwrap();
    assert_eq!(sides.proposers().len(), 4);
    assert_eq!(sides.receivers().len(), 3);
}

#[test]
fn test_ranking_ties_break_by_id() {
    let members: Vec<Member> = (0..4)
        .map(|id| Member::new(id, GenderIdentity::NonBinary, Orientation::Bisexual))
        .collect();
    let sides = SideAssignment::with_proposers(4, &[0]).unwrap();
    let scores = ScoreMatrix::new(vec![
        vec![0.0, 0.5, 0.5, 0.5],
        vec![0.0; 4],
        vec![0.0; 4],
        vec![0.0; 4],
    ])
    .unwrap();

    let builder = RankingBuilder::new(&members, &sides, &scores);
    assert_eq!(builder.build(0), vec![1, 2, 3]);
}

#[test]
fn test_asymmetric_scores_read_from_evaluator_row() {
    let members: Vec<Member> = (0..3)
        .map(|id| Member::new(id, GenderIdentity::NonBinary, Orientation::Bisexual))
        .collect();
    let sides = SideAssignment::with_proposers(3, &[0, 1]).unwrap();
    // Proposers value 2 equally; 2 values 0 far higher than 1 does
    let scores = ScoreMatrix::new(vec![
        vec![0.0, 0.0, 0.5],
        vec![0.0, 0.0, 0.5],
        vec![0.9, 0.1, 0.0],
    ])
    .unwrap();

    let builder = RankingBuilder::new(&members, &sides, &scores);
    let state: MatchState = StableMatcher::new(builder, QueueDiscipline::Lifo).run();
    let matching = assemble(3, &state).unwrap();

    assert!(matching.contains(0, 2));
    assert!(matching.unmatched.contains(&1));
    assert!(find_blocking_pairs(&builder, &matching).is_empty());
}

#[test]
fn test_questionnaire_scores_feed_matcher() {
    let profiles = vec![
        QuestionnaireProfile {
            gender_identity: GenderIdentity::Female,
            orientation: Orientation::PrefersWomen,
            grad_year: 2023,
            responses: vec![0, 1, 2, 3],
        },
        QuestionnaireProfile {
            gender_identity: GenderIdentity::Female,
            orientation: Orientation::PrefersWomen,
            grad_year: 2024,
            responses: vec![0, 1, 2, 5],
        },
    ];

    let scores = compute_score_matrix(&profiles, &ScoringWeights::default()).unwrap();

    // 3 of 4 answers shared, same identity cohort term 0.3 at half weight
    assert!((scores.get(0, 1) - 0.9).abs() < 1e-9);
    assert_eq!(scores.get(1, 0), scores.get(0, 1));
}

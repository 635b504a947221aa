use chordwise::theory::{
    build_chord, build_progression, degree_to_roman, difficulty::LEVELS, get_random_progression,
    index_to_note, infer_quality, note_to_index, progression::all_templates, random_key,
    roman_to_degree, ChordQuality, Key, Mode, Style,
};

#[test]
fn numerals_round_trip_for_every_degree_mode_and_quality() {
    for mode in [Mode::Major, Mode::Minor] {
        for degree in 1..=7 {
            for quality in ChordQuality::ALL {
                let numeral = degree_to_roman(degree, mode, Some(quality));
                assert_eq!(roman_to_degree(&numeral), Some(degree), "{numeral}");
            }
            let diatonic = degree_to_roman(degree, mode, None);
            assert_eq!(roman_to_degree(&diatonic), Some(degree));
        }
    }
}

#[test]
fn spelled_numerals_infer_their_own_triad() {
    for mode in [Mode::Major, Mode::Minor] {
        for degree in 1..=7 {
            for quality in [
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Diminished,
                ChordQuality::Augmented,
            ] {
                let numeral = degree_to_roman(degree, mode, Some(quality));
                assert_eq!(infer_quality(&numeral), quality, "{numeral}");
            }
        }
    }
}

#[test]
fn diatonic_chords_stay_in_the_key() {
    for key in Key::all() {
        let scale: Vec<u8> = key.notes.iter().map(|n| n.pitch_class()).collect();
        for degree in 1..=7 {
            let chord = build_chord(key.name, degree, None).unwrap();
            for pc in chord.pitch_classes() {
                assert!(scale.contains(&pc), "{} in {}", chord.name, key.name);
            }
        }
    }
}

#[test]
fn chord_notes_round_trip_through_spelling() {
    let chord = build_chord("Eb", 4, None).unwrap();
    for note in chord.midi_notes {
        let (name, octave) = index_to_note(note, true);
        assert_eq!(note_to_index(&name.to_string(), octave), Some(note));
    }
}

#[test]
fn every_tier_can_pick_and_build_a_progression() {
    let mut rng = fastrand::Rng::with_seed(99);
    for level in &LEVELS {
        for _ in 0..20 {
            let key = random_key(level.tier, &mut rng);
            let template = get_random_progression(level.tier, level.styles);
            assert!(template.difficulty <= level.tier);

            let built = build_progression(key.name, template).unwrap();
            assert_eq!(built.chords.len(), template.numerals.len());
            assert_eq!(built.answer(), template.answer());
            for (chord, numeral) in built.chords.iter().zip(template.numerals) {
                assert_eq!(chord.roman_numeral, *numeral);
                assert!(!chord.midi_notes.is_empty());
            }
        }
    }
}

#[test]
fn library_templates_are_well_formed() {
    for template in all_templates() {
        assert!(!template.numerals.is_empty(), "{}", template.name);
        assert!((1..=5).contains(&template.difficulty), "{}", template.name);
        for numeral in template.numerals {
            assert!(roman_to_degree(numeral).is_some(), "{numeral} in {}", template.name);
        }
    }
    assert!(Style::ALL.iter().all(|s| !s.templates().is_empty()));
}

use rand::Rng;

/// A German word or phrase with its English meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VocabItem {
    pub native: &'static str,
    pub translation: &'static str,
}

impl VocabItem {
    pub const fn new(native: &'static str, translation: &'static str) -> Self {
        Self {
            native,
            translation,
        }
    }

    /// What gets read aloud when the word is announced in the game.
    pub fn spoken(&self) -> String {
        format!("{}. {}", self.native, self.translation)
    }
}

/// A1 word bank shared by every activity.
pub const WORDS: [VocabItem; 41] = [
    VocabItem::new("Hallo", "Hello"),
    VocabItem::new("Danke", "Thank you"),
    VocabItem::new("Bitte", "Please/You are welcome"),
    VocabItem::new("Ja", "Yes"),
    VocabItem::new("Nein", "No"),
    VocabItem::new("Guten Morgen", "Good morning"),
    VocabItem::new("Gute Nacht", "Good night"),
    VocabItem::new("Tschüss", "Bye"),
    VocabItem::new("Wie geht’s?", "How are you?"),
    VocabItem::new("Ich heiße SKY", "My name is SKY"),
    VocabItem::new("Ich", "I"),
    VocabItem::new("Du", "You"),
    VocabItem::new("Er", "He"),
    VocabItem::new("Sie", "She/They"),
    VocabItem::new("Wir", "We"),
    VocabItem::new("Es", "It"),
    VocabItem::new("Haus", "House"),
    VocabItem::new("Wasser", "Water"),
    VocabItem::new("Brot", "Bread"),
    VocabItem::new("Milch", "Milk"),
    VocabItem::new("Kaffee", "Coffee"),
    VocabItem::new("Tee", "Tea"),
    VocabItem::new("Apfel", "Apple"),
    VocabItem::new("Käse", "Cheese"),
    VocabItem::new("Katze", "Cat"),
    VocabItem::new("Hund", "Dog"),
    VocabItem::new("Buch", "Book"),
    VocabItem::new("Schule", "School"),
    VocabItem::new("Lehrer", "Teacher"),
    VocabItem::new("Student", "Student"),
    VocabItem::new("Fußball", "Football"),
    VocabItem::new("Auto", "Car"),
    VocabItem::new("Zug", "Train"),
    VocabItem::new("Straße", "Street"),
    VocabItem::new("Stadt", "City"),
    VocabItem::new("Freund", "Friend"),
    VocabItem::new("Familie", "Family"),
    VocabItem::new("Essen", "Food"),
    VocabItem::new("Trinken", "Drink"),
    VocabItem::new("Lernen", "Learn"),
    VocabItem::new("Sprechen", "Speak"),
];

pub fn random_word<R: Rng + ?Sized>(rng: &mut R) -> VocabItem {
    WORDS[rng.gen_range(0..WORDS.len())]
}

//! User-facing text, one table per output language.

use std::fmt;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Hungarian
    #[default]
    Hu,
    /// English
    En,
}

impl Language {
    /// BCP 47 tag, used for `<html lang>`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Hu => "hu",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn strings(self) -> &'static Strings {
        match self {
            Self::Hu => &HU,
            Self::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug)]
pub struct HowItWorksStep {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug)]
pub struct Strings {
    pub brand_first: &'static str,
    pub brand_second: &'static str,
    pub nav_how_it_works: &'static str,

    pub hero_badge: &'static str,
    pub hero_title: &'static str,
    pub hero_title_accent: &'static str,
    pub hero_text: &'static str,

    pub upload_title: &'static str,
    pub upload_text: &'static str,
    pub upload_button: &'static str,
    pub not_an_image: &'static str,
    pub image_preview_alt: &'static str,
    pub image_ready: &'static str,
    pub clear_image: &'static str,
    pub generate_button: &'static str,

    pub loader_title: &'static str,
    pub loader_messages: &'static [&'static str],

    pub alert_title: &'static str,
    pub alert_dismiss: &'static str,
    /// Shown when the model finds no food but gives no reason.
    pub no_food_fallback: &'static str,
    /// Shown when generation fails for any technical reason.
    pub generic_error: &'static str,

    pub result_banner: &'static str,
    pub new_photo: &'static str,
    pub back_to_kitchen: &'static str,
    pub card_badge: &'static str,
    pub ingredients: &'static str,
    pub instructions: &'static str,
    pub tips: &'static str,

    pub how_title: &'static str,
    pub how_mission: &'static str,
    pub how_steps: [HowItWorksStep; 3],
    pub how_upload_options: &'static str,
    pub how_upload_choices: [&'static str; 2],
    pub how_tip: &'static str,
    pub back_home: &'static str,

    pub footer_tagline: &'static str,
}

static HU: Strings = Strings {
    brand_first: "Maradék",
    brand_second: "Séf",
    nav_how_it_works: "Hogyan működik?",

    hero_badge: "Látás-alapú AI segítségével",
    hero_title: "A maradékai,",
    hero_title_accent: "újragondolva.",
    hero_text: "Ne hagyja kárba veszni az alapanyagokat. Készítsen egy fotót, és kapjon azonnal egy személyre szabott, ízletes receptet AI séfünktől.",

    upload_title: "Töltse fel a maradékait",
    upload_text: "Válasszon egy fotót a hozzávalókról, vagy fényképezze le a hűtője tartalmát, és nézze meg, mi lesz belőle.",
    upload_button: "Fotó feltöltése",
    not_an_image: "Ez a fájl nem kép. Kérjük, válasszon egy fényképet a hozzávalókról.",
    image_preview_alt: "A hozzávalók előnézete",
    image_ready: "A kép készen áll a feldolgozásra",
    clear_image: "Kép törlése",
    generate_button: "Főzzünk valami jót",

    loader_title: "Varázslat készülődik...",
    loader_messages: &[
        "Digitális séfünk éppen átnézi a hűtőjét...",
        "Elemezzük a hozzávalókban rejlő lehetőségeket...",
        "Digitális szakácskönyvekben lapozgatunk...",
        "Tökéletesítjük a fűszerkombinációkat...",
        "Élezzük a virtuális késeket...",
        "Konzultálunk a titkos receptarchívummal...",
        "Már majdnem kész! Az ízek összeérnek...",
        "Mesterchef módba kapcsoltunk...",
    ],

    alert_title: "Konyhai baki!",
    alert_dismiss: "Bezárás",
    no_food_fallback: "Sajnos nem sikerült azonosítani a hozzávalókat. Próbálj meg egy élesebb fotót készíteni!",
    generic_error: "Valami hiba történt a digitális konyhánkban. Kérlek, próbáld újra!",

    result_banner: "Nézze, mit találtunk a konyhájában!",
    new_photo: "Új fotó",
    back_to_kitchen: "Vissza a konyhába",
    card_badge: "Séf Ajánlata",
    ingredients: "Hozzávalók",
    instructions: "Lépésről lépésre",
    tips: "A Séf Titkai",

    how_title: "Hogyan működik?",
    how_mission: "Küldetésünk az élelmiszerpazarlás csökkentése a technológia és a kreativitás segítségével.",
    how_steps: [
        HowItWorksStep {
            title: "1. Fotózzon",
            text: "Készítsen egy fényképet a hűtője tartalmáról vagy a pulton maradt alapanyagokról. Akár több hozzávalót is a képre tehet egyszerre.",
        },
        HowItWorksStep {
            title: "2. Elemzés",
            text: "Fejlett látás-alapú mesterséges intelligenciánk felismeri az alapanyagokat és keresi a legjobb párosításokat a digitális recepttárában.",
        },
        HowItWorksStep {
            title: "3. Főzzön",
            text: "Másodpercek alatt kap egy teljes receptet, pontos utasításokkal és profi tippekkel. Nincs több gondolkodás a vacsorán!",
        },
    ],
    how_upload_options: "A főoldalon található feltöltési zónában két lehetősége van:",
    how_upload_choices: [
        "Válasszon ki egy meglévő fotót a készülékéről.",
        "Mobilon készítsen új fotót közvetlenül a kamerával.",
    ],
    how_tip: "Tipp: A legjobb eredmény érdekében ügyeljen a jó megvilágításra, és arra, hogy az alapanyagok jól láthatóak legyenek a képen.",
    back_home: "Vissza a főoldalra",

    footer_tagline: "Kevesebb hulladék, több íz.",
};

static EN: Strings = Strings {
    brand_first: "Leftover",
    brand_second: "Chef",
    nav_how_it_works: "How it works",

    hero_badge: "Powered by vision AI",
    hero_title: "Your leftovers,",
    hero_title_accent: "reimagined.",
    hero_text: "Don't let ingredients go to waste. Snap a photo and get a personalised, delicious recipe from our AI chef in seconds.",

    upload_title: "Upload Your Leftovers",
    upload_text: "Pick a photo of your ingredients or snap your fridge to see the magic happen.",
    upload_button: "Upload Photo",
    not_an_image: "That file is not an image. Please choose a photo of your ingredients.",
    image_preview_alt: "Ingredient preview",
    image_ready: "Image ready for processing",
    clear_image: "Remove image",
    generate_button: "Let's cook something good",

    loader_title: "Magic in the making...",
    loader_messages: &[
        "Our digital chef is checking your fridge...",
        "Analysing what your ingredients can become...",
        "Leafing through digital cookbooks...",
        "Perfecting the spice combinations...",
        "Sharpening the virtual knives...",
        "Consulting the secret recipe archive...",
        "Almost done! Letting the flavours come together...",
        "Switched to master chef mode...",
    ],

    alert_title: "Kitchen mishap!",
    alert_dismiss: "Dismiss",
    no_food_fallback: "We couldn't identify any ingredients. Try taking a sharper photo!",
    generic_error: "Something went wrong in our digital kitchen. Please try again!",

    result_banner: "Look what we found in your kitchen!",
    new_photo: "New photo",
    back_to_kitchen: "Back to the kitchen",
    card_badge: "Chef's Pick",
    ingredients: "Ingredients",
    instructions: "Step by step",
    tips: "Chef's Secrets",

    how_title: "How it works",
    how_mission: "Our mission is to reduce food waste with technology and creativity.",
    how_steps: [
        HowItWorksStep {
            title: "1. Snap",
            text: "Take a photo of what's in your fridge or left on the counter. You can fit several ingredients into one picture.",
        },
        HowItWorksStep {
            title: "2. Analyse",
            text: "Our vision AI recognises the ingredients and looks for the best pairings in its digital recipe library.",
        },
        HowItWorksStep {
            title: "3. Cook",
            text: "Within seconds you get a complete recipe with precise steps and pro tips. No more wondering what's for dinner!",
        },
    ],
    how_upload_options: "The upload zone on the home page gives you two options:",
    how_upload_choices: [
        "Choose an existing photo from your device.",
        "On mobile, take a new photo straight from the camera.",
    ],
    how_tip: "Tip: for the best results, use good lighting and make sure the ingredients are clearly visible.",
    back_home: "Back to the home page",

    footer_tagline: "Less waste, more flavour.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_languages_have_loader_texts() {
        for lang in [Language::Hu, Language::En] {
            let s = lang.strings();
            assert!(!s.loader_messages.is_empty());
            assert!(!s.no_food_fallback.is_empty());
        }
        assert_eq!(Language::default(), Language::Hu);
        assert_eq!(Language::En.to_string(), "en");
    }
}

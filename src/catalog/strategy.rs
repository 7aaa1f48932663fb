use std::collections::BTreeMap;

use crate::{
    catalog::{AttributeCatalog, Dimension, RelevanceRule, build_entries},
    error::EngineError,
};

/// Rich "visual strategy" vocabulary used by the strategist layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyDimension {
    Concept,
    PhotographyStyle,
    Setting,
    Lighting,
    Composition,
}

impl Dimension for StrategyDimension {
    const ALL: &'static [Self] = &[
        Self::Concept,
        Self::PhotographyStyle,
        Self::Setting,
        Self::Lighting,
        Self::Composition,
    ];
    const LAYER: &'static str = "strategy";
    const REFERENCE: Self = Self::PhotographyStyle;

    fn label(self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::PhotographyStyle => "Photography",
            Self::Setting => "Setting",
            Self::Lighting => "Lighting",
            Self::Composition => "Composition",
        }
    }

    fn salt(self) -> u64 {
        match self {
            Self::Concept => CONCEPT_SALT,
            Self::PhotographyStyle => PHOTOGRAPHY_SALT,
            Self::Setting => SETTING_SALT,
            Self::Lighting => STRATEGY_LIGHTING_SALT,
            Self::Composition => COMPOSITION_SALT,
        }
    }

    fn default_minimum_viable(self) -> usize {
        match self {
            Self::Setting => 2,
            _ => 3,
        }
    }

    fn relevance(self) -> RelevanceRule {
        match self {
            Self::Concept | Self::PhotographyStyle => RelevanceRule::Sector,
            Self::Setting => RelevanceRule::SectorAndOccasion,
            Self::Lighting | Self::Composition => RelevanceRule::Universal,
        }
    }

    fn similarity_weight(self) -> u32 {
        match self {
            Self::Concept => 30,
            Self::PhotographyStyle => 25,
            Self::Setting => 20,
            Self::Lighting => 15,
            Self::Composition => 10,
        }
    }
}

pub const CONCEPT_SALT: u64 = 7927;
pub const PHOTOGRAPHY_SALT: u64 = 7933;
pub const SETTING_SALT: u64 = 7937;
pub const STRATEGY_LIGHTING_SALT: u64 = 7949;
pub const COMPOSITION_SALT: u64 = 7951;

pub fn builtin_strategy_catalog() -> Result<AttributeCatalog<StrategyDimension>, EngineError> {
    let mut dimensions = BTreeMap::new();
    dimensions.insert(StrategyDimension::Concept, build_entries(CONCEPTS));
    dimensions.insert(
        StrategyDimension::PhotographyStyle,
        build_entries(PHOTOGRAPHY_STYLES),
    );
    dimensions.insert(StrategyDimension::Setting, build_entries(SETTINGS));
    dimensions.insert(StrategyDimension::Lighting, build_entries(LIGHTINGS));
    dimensions.insert(StrategyDimension::Composition, build_entries(COMPOSITIONS));
    AttributeCatalog::from_entries(dimensions)
}

type Row = (&'static str, &'static [&'static str], &'static str);

const CONCEPTS: &[Row] = &[
    ("Authentic morning pleasure", &["food", "breakfast"], "Morning ritual, real appetite, unhurried start"),
    ("Energising gourmet break", &["food", "refreshment"], "Mid-day pick-me-up, bright and lively"),
    ("Convivial family sharing", &["food", "family"], "Hands reaching across one table"),
    ("Refined taste discovery", &["food", "gourmet"], "First bite, curiosity, attentive detail"),
    ("Daily wellbeing ritual", &["food", "wellness"], "Small healthy habit done with care"),
    ("Pure indulgence moment", &["food", "treat"], "Unapologetic treat, texture close-up"),
    ("Modern culinary tradition", &["food", "heritage"], "Heritage recipe restaged in a modern way"),
    ("Bursting natural freshness", &["food", "beverage", "refreshment"], "Cold, crisp, just-picked freshness"),
    ("Simple authentic pleasure", &["food", "lifestyle"], "Unstaged everyday enjoyment"),
    ("Positive morning energy", &["food", "beverage", "breakfast"], "Sunlit morning momentum"),
    ("Warm comforting moment", &["food", "comfort"], "Blanket, steam and slow evenings"),
    ("Unique sensory experience", &["food", "beverage"], "Sound, texture and aroma made visible"),
    ("Premium artisanal quality", &["food", "craft"], "Maker's hands and honest materials"),
    ("Confident natural origins", &["food", "terroir"], "Where it comes from, shown plainly"),
    ("Subtle taste innovation", &["food", "innovation"], "Familiar format, surprising twist"),
    ("Luminous morning beauty ritual", &["beauty", "morning"], "Bathroom light, fresh skin, calm"),
    ("Radiant natural transformation", &["beauty"], "Before-and-after told through light"),
    ("Personal care moment", &["beauty", "wellness"], "Time taken for oneself"),
    ("Authentic radiant confidence", &["beauty"], "Unretouched, self-assured expression"),
    ("Effortless natural elegance", &["beauty", "fashion"], "Quiet polish, nothing forced"),
    ("Visible inner wellbeing", &["beauty", "wellness"], "Health that shows on the outside"),
    ("Minimalist beauty routine", &["beauty", "minimal"], "Three products, one shelf"),
    ("Ingredient purity", &["beauty", "clean"], "Raw botanicals beside the formula"),
    ("Body and mind harmony", &["beauty", "wellness"], "Movement, breath and skin together"),
    ("Timeless Parisian elegance", &["fashion", "luxury"], "Cobblestones, trench coats, poise"),
    ("Casual chic style", &["fashion", "lifestyle"], "Dressed down, still deliberate"),
    ("Everyday discreet luxury", &["fashion", "luxury"], "Quality you notice up close"),
    ("Unique personal expression", &["fashion"], "Outfit as autobiography"),
    ("Modern take on a classic", &["fashion", "heritage"], "Archive piece, new context"),
    ("Premium fashion craftsmanship", &["fashion", "craft"], "Atelier detail, stitches and hands"),
    ("Avant-garde trend", &["fashion", "creative"], "Bold silhouette, unexpected pairing"),
    ("Intuitive technological innovation", &["tech"], "Technology that needs no manual"),
    ("Elegant digital simplicity", &["tech", "minimal"], "One device, one gesture"),
    ("Authentic human connectivity", &["tech", "social"], "People brought together by screens"),
    ("Discreet powerful performance", &["tech"], "Power shown through calm"),
    ("Technology serving people", &["tech", "wellness"], "Human benefit in the foreground"),
    ("Serene optimised productivity", &["tech", "work"], "Clean desk, clear head"),
    ("Invisible yet present technology", &["tech", "home"], "Devices blending into the home"),
    ("Responsible eco performance", &["tech", "sustainability"], "Efficiency with a lighter footprint"),
];

const PHOTOGRAPHY_STYLES: &[Row] = &[
    ("Bright breakfast editorial", &["food", "breakfast"], "Airy white surfaces, morning window light"),
    ("Rustic charm food reportage", &["food", "heritage"], "Wood, iron skillets, hearty portions"),
    ("Natural light food diary", &["food"], "Single window, honest shadows"),
    ("Lifestyle integration food", &["food", "lifestyle"], "Food in real rooms with real people"),
    ("Nordic minimalist food", &["food", "minimal"], "Pale stoneware, restrained styling"),
    ("Artistic still-life composition", &["food", "creative"], "Painterly arrangement, deliberate props"),
    ("Moody dark food atmosphere", &["food", "comfort"], "Low-key light, deep shadows, rich tones"),
    ("Scandinavian clean food", &["food", "beverage", "minimal"], "Cool daylight, linen, negative space"),
    ("French elegance table", &["food", "beverage", "luxury"], "Silverware, cut glass, soft gold light"),
    ("Organic beauty of ingredients", &["food", "beverage", "terroir"], "Raw produce as hero"),
    ("High-speed beverage splash", &["beverage", "refreshment"], "Frozen liquid crowns and droplets"),
    ("Dramatic beauty portrait", &["beauty"], "Strong key, theatrical expression"),
    ("Glamour luxury beauty", &["beauty", "luxury"], "Saturated colour, polished skin"),
    ("Natural elegance portrait", &["beauty", "fashion"], "Black-and-white, minimal retouch"),
    ("Ethereal beauty", &["beauty"], "Soft focus, pastel haze"),
    ("Editorial beauty perfection", &["beauty"], "Magazine-grade precision"),
    ("Contemporary edge beauty", &["beauty", "creative"], "Graphic crops, unexpected colour"),
    ("Minimalist chic beauty", &["beauty", "minimal"], "Plain backdrop, product and skin only"),
    ("Whimsical storytelling beauty", &["beauty", "creative"], "Fairy-tale props and scale play"),
    ("Timeless fashion elegance", &["fashion"], "Monochrome, windswept, cinematic"),
    ("Romantic fashion sophistication", &["fashion", "luxury"], "Painterly colour, long exposures"),
    ("Editorial fashion mastery", &["fashion"], "Studio control, strong poses"),
    ("Vibrant luxury fashion", &["fashion", "luxury"], "Sun-soaked colour, jet-set locations"),
    ("Narrative fashion portrait", &["fashion"], "Story in a single frame"),
    ("Authentic raw fashion", &["fashion", "creative"], "Flash, grain, unpolished honesty"),
    ("Minimalist tech perfection", &["tech", "minimal"], "Floating product on seamless white"),
    ("Tech lifestyle integration", &["tech", "lifestyle"], "Devices in everyday hands"),
    ("Human-centred tech design", &["tech"], "Faces first, screens second"),
    ("Futuristic tech elegance", &["tech", "innovation"], "Cool gradients, sleek reflections"),
    ("Functional tech beauty", &["tech", "craft"], "Engineering detail as ornament"),
    ("Luxury precision tech", &["tech", "luxury"], "Brushed metal, macro textures"),
    ("Creative empowerment tech", &["tech", "creative"], "Makers at work with their tools"),
];

const SETTINGS: &[Row] = &[
    ("Rustic kitchen with marble countertop", &["food", "breakfast", "morning"], "Worn marble, copper pans"),
    ("Modern breakfast nook in natural wood", &["food", "beverage", "breakfast"], "Bench seating, morning sun"),
    ("Cosy family dining room", &["food", "family", "evening"], "Warm lamps, shared dishes"),
    ("Minimalist kitchen island", &["food", "beverage", "minimal"], "Clean lines, one hero object"),
    ("Outdoor picnic in nature", &["food", "beverage", "outdoor", "summer", "refreshment"], "Meadow, blanket, basket"),
    ("Artisan bakery counter", &["food", "craft", "breakfast"], "Flour dust, wooden peels"),
    ("Contemporary urban café", &["food", "beverage", "coffee", "morning"], "Concrete, plants, espresso bar"),
    ("Traditional farmhouse kitchen", &["food", "heritage"], "Cast iron range, herbs drying"),
    ("Elegant restaurant table", &["food", "gourmet", "dinner"], "White linen, candlelight"),
    ("Sunny terrace by the sea", &["beverage", "summer", "refreshment"], "Blue horizon, ice in glasses"),
    ("Gym bench after a workout", &["beverage", "sport", "refreshment"], "Towel, bottle, chalk dust"),
    ("Luxurious marble bathroom with spa mood", &["beauty", "wellness"], "Steam, eucalyptus, marble"),
    ("Natural light vanity", &["beauty", "morning"], "Mirror, window, morning ritual"),
    ("Minimalist serene bedroom", &["beauty", "wellness", "evening"], "Linen sheets, soft dusk"),
    ("Professional salon", &["beauty"], "Expert tools, salon chair"),
    ("Outdoor organic garden", &["beauty", "outdoor", "wellness"], "Botanicals, dappled light"),
    ("Vintage dressing room", &["beauty", "fashion", "heritage"], "Velvet, bulbs around a mirror"),
    ("Sophisticated hotel suite", &["beauty", "fashion", "luxury", "travel"], "City view, room service"),
    ("Parisian cobblestone street", &["fashion", "outdoor"], "Haussmann facades, morning bustle"),
    ("Designer atelier", &["fashion", "craft"], "Mannequins, pinned patterns"),
    ("Brutalist gallery space", &["fashion", "creative"], "Raw concrete, sculptural light"),
    ("Rooftop at golden hour", &["fashion", "beverage", "evening"], "Skyline, warm flare"),
    ("Bright home office", &["tech", "work"], "Plants, standing desk, daylight"),
    ("Open-plan innovation lab", &["tech", "innovation", "work"], "Whiteboards, prototypes"),
    ("Commuter train window seat", &["tech", "travel", "on-the-go"], "Passing landscape, earbuds"),
    ("Smart living room", &["tech", "home", "evening"], "Ambient lighting, sofa, screen"),
    ("Clean studio backdrop", &["all"], "Seamless paper, product focus"),
    ("Everyday home interior", &["all"], "Lived-in, relatable space"),
];

const LIGHTINGS: &[Row] = &[
    ("Golden hour window light, 3200K warmth", &["all"], "Warm, directional, long shadows"),
    ("Soft diffused natural light, 4000K neutral", &["all"], "Even, forgiving, natural"),
    ("Dramatic side lighting, 2800K intimate", &["all"], "Deep contrast, sculpted form"),
    ("Bright even studio light, 5000K crisp", &["all"], "Flat, clean, catalogue-ready"),
    ("Moody atmospheric light, 3000K cozy", &["all"], "Low-key, practical lamps"),
    ("Clean minimalist light, 5500K pure", &["all"], "Daylight-balanced, airy"),
    ("Warm ambient light, 2700K comfortable", &["all"], "Home interior glow"),
    ("Dynamic directional light, 4500K energetic", &["all"], "Hard beam, crisp edges"),
    ("Ethereal backlight, 6000K dreamy", &["all"], "Halo rim, glowing translucency"),
    ("Professional commercial light, 4200K balanced", &["all"], "Key, fill and rim in balance"),
];

const COMPOSITIONS: &[Row] = &[
    ("Rule of thirds, shallow depth of field", &["all"], "Subject off-centre, soft background"),
    ("Central symmetry, balanced composition", &["all"], "Mirror balance around the product"),
    ("Leading lines, dynamic perspective", &["all"], "Lines pulling the eye to the hero"),
    ("Golden ratio, harmonious proportions", &["all"], "Spiral flow through the frame"),
    ("Negative space, minimalist focus", &["all"], "Most of the frame left empty"),
    ("Diagonal composition, energetic flow", &["all"], "Tilted axis, movement"),
    ("Frame within frame, layered depth", &["all"], "Doorways, windows, arches"),
    ("Pattern repetition, rhythmic visual", &["all"], "Repeated forms with one break"),
    ("Asymmetrical balance, modern tension", &["all"], "Weight offset by colour or space"),
    ("Close-up macro, intimate detail", &["all"], "Texture fills the frame"),
];

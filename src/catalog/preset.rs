use std::collections::BTreeMap;

use crate::{
    catalog::{AttributeCatalog, Dimension, RelevanceRule, build_entries},
    error::EngineError,
};

/// Coarse preset vocabulary: the five independent axes of one post's look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PresetDimension {
    Style,
    Palette,
    Framework,
    Context,
    Lighting,
}

impl Dimension for PresetDimension {
    const ALL: &'static [Self] = &[
        Self::Style,
        Self::Palette,
        Self::Framework,
        Self::Context,
        Self::Lighting,
    ];
    const LAYER: &'static str = "preset";
    const REFERENCE: Self = Self::Style;

    fn label(self) -> &'static str {
        match self {
            Self::Style => "Style",
            Self::Palette => "Palette",
            Self::Framework => "Framework",
            Self::Context => "Context",
            Self::Lighting => "Lighting",
        }
    }

    fn salt(self) -> u64 {
        match self {
            Self::Style => STYLE_SALT,
            Self::Palette => PALETTE_SALT,
            Self::Framework => FRAMEWORK_SALT,
            Self::Context => CONTEXT_SALT,
            Self::Lighting => LIGHTING_SALT,
        }
    }

    fn default_minimum_viable(self) -> usize {
        match self {
            Self::Context => 2,
            _ => 3,
        }
    }

    fn relevance(self) -> RelevanceRule {
        match self {
            Self::Style => RelevanceRule::Sector,
            Self::Context => RelevanceRule::SectorAndOccasion,
            Self::Palette | Self::Framework | Self::Lighting => RelevanceRule::Universal,
        }
    }

    fn similarity_weight(self) -> u32 {
        // Framework plays the "concept" role of the strategy layer.
        match self {
            Self::Framework => 30,
            Self::Style => 25,
            Self::Context => 20,
            Self::Lighting => 15,
            Self::Palette => 10,
        }
    }
}

pub const STYLE_SALT: u64 = 7919;
pub const CONTEXT_SALT: u64 = 8191;
pub const PALETTE_SALT: u64 = 8209;
pub const FRAMEWORK_SALT: u64 = 8221;
pub const LIGHTING_SALT: u64 = 8231;

pub fn builtin_preset_catalog() -> Result<AttributeCatalog<PresetDimension>, EngineError> {
    let mut dimensions = BTreeMap::new();
    dimensions.insert(PresetDimension::Style, build_entries(STYLES));
    dimensions.insert(PresetDimension::Palette, build_entries(PALETTES));
    dimensions.insert(PresetDimension::Framework, build_entries(FRAMEWORKS));
    dimensions.insert(PresetDimension::Context, build_entries(CONTEXTS));
    dimensions.insert(PresetDimension::Lighting, build_entries(LIGHTINGS));
    AttributeCatalog::from_entries(dimensions)
}

type Row = (&'static str, &'static [&'static str], &'static str);

const STYLES: &[Row] = &[
    (
        "Michelin Star Sculptural Artistry",
        &["food-beverage", "luxury-prestige"],
        "Haute cuisine as sculpture, porcelain negative space, single hard key light from 45 degrees, macro detail on sauce work",
    ),
    (
        "Nordic Foraging Terroir Poetry",
        &["food-beverage", "sustainability-purpose"],
        "Wild ingredients on weathered stone, overcast Scandinavian daylight, moss and lichen textures, muted earthy grade",
    ),
    (
        "Molecular Gastronomy Science Theatre",
        &["food-beverage", "experimental-art"],
        "Laboratory glassware meets plating, liquid nitrogen vapour, cool rim lights on black, suspended droplets",
    ),
    (
        "Japanese Kaiseki Seasonal Meditation",
        &["food-beverage", "minimal"],
        "Seasonal lacquerware, shoji-diffused light, asymmetric wabi-sabi composition, restrained palette",
    ),
    (
        "French Classique Heritage Revival",
        &["food-beverage", "luxury-prestige"],
        "Silverware and linen, warm tungsten practicals, Dutch still-life chiaroscuro, heritage brasserie mood",
    ),
    (
        "Italian Nonna Kitchen Documentary",
        &["food-beverage", "documentary-editorial"],
        "Floured hands and worn wooden boards, window light, candid reportage framing, generational warmth",
    ),
    (
        "American Diner Nostalgia Revival",
        &["food-beverage", "lifestyle-wellness"],
        "Chrome counters and neon signage, saturated Kodachrome tones, low-angle hero framing",
    ),
    (
        "Korean Home Kitchen Banchan Ballet",
        &["food-beverage", "flatlay"],
        "Overhead grid of small dishes, soft top light, chopstick motion, rhythmic repetition",
    ),
    (
        "Mexican Street Market Abundance",
        &["food-beverage", "documentary-editorial"],
        "Crowded market stalls, hard midday sun, papel picado colour, handheld energy",
    ),
    (
        "Tokyo Izakaya Intimate Glow",
        &["food-beverage", "cinematic"],
        "Paper lanterns and steam, warm practical bokeh, tight counter-level framing",
    ),
    (
        "Marrakech Souk Spice Sensory",
        &["food-beverage", "cinematic"],
        "Spice pyramids in shafts of dusty light, saturated ochre and saffron, layered depth",
    ),
    (
        "Wine Chateau Terroir Documentary",
        &["food-beverage", "luxury-prestige"],
        "Cellar barrels and vineyard rows, low golden sun, glass rim highlights",
    ),
    (
        "Craft Beer Brewery Documentary",
        &["food-beverage", "documentary-editorial"],
        "Copper kettles, brewer portraits, foam macro, industrial backlight",
    ),
    (
        "Premium Spirits Luxury Portrait",
        &["food-beverage", "luxury-prestige"],
        "Bottle as monument on gradient black, strip lights tracing the silhouette, amber liquid glow",
    ),
    (
        "Coffee Third Wave Craftsmanship",
        &["food-beverage", "lifestyle-wellness"],
        "Pour-over ritual, crema macro, barista hands, soft café window light",
    ),
    (
        "Fresh Juice Kinetic Explosion",
        &["food-beverage", "sports-performance"],
        "Fruit bursting through liquid, high-speed strobe freeze, vivid citrus colour",
    ),
    (
        "Liquid Splash High-Speed Freeze",
        &["food-beverage", "studio"],
        "Sculpted splash crown around the product, black void, twin rim strobes",
    ),
    (
        "Condensation Macro Refreshment",
        &["food-beverage", "studio"],
        "Cold droplets on glass, backlit translucency, crisp ice texture",
    ),
    (
        "Breakfast Table Morning Ritual",
        &["food-beverage", "lifestyle-wellness"],
        "Sunlit breakfast spread, linen and ceramics, gentle morning haze",
    ),
    (
        "Tea Ceremony Slow Living",
        &["food-beverage", "minimal"],
        "Steam curling from handmade cups, calm negative space, tatami textures",
    ),
    (
        "Smoothie Bowl Overhead Colour",
        &["food-beverage", "flatlay"],
        "Top-down bowl with geometric toppings, bright even light, pastel surfaces",
    ),
    (
        "Cocktail Bar Noir Glamour",
        &["food-beverage", "cinematic"],
        "Dark bar counter, single spotlight through smoke, jewel-toned drink",
    ),
    (
        "Lifestyle Casual Authentic",
        &["lifestyle-wellness"],
        "Candid everyday moments, natural window light, relatable homes, warm muted tones",
    ),
    (
        "Mindful Living Sanctuary",
        &["lifestyle-wellness", "minimal"],
        "Calm interiors, linen and plants, diffuse daylight, breathing room",
    ),
    (
        "Adventure Wellness Expedition",
        &["lifestyle-wellness", "sports-performance"],
        "Trail and summit moments, wide environmental framing, crisp alpine light",
    ),
    (
        "Picnic Golden Afternoon",
        &["lifestyle-wellness", "nature"],
        "Blanket on meadow grass, low sun flare, shared food and laughter",
    ),
    (
        "Athlete Hydration Sweat Portrait",
        &["sports-performance"],
        "Sweat-beaded athlete mid-break, hard side light, gritty contrast",
    ),
    (
        "Kinetic Motion Blur Energy",
        &["sports-performance", "cinematic"],
        "Panning blur with a sharp product, streaked city lights, speed lines",
    ),
    (
        "Climate Action Documentary",
        &["sustainability-purpose", "documentary-editorial"],
        "Real landscapes and communities, honest natural light, reportage framing",
    ),
    (
        "Regenerative Agriculture Hope",
        &["sustainability-purpose", "nature"],
        "Soil-covered hands and green shoots, morning field light, hopeful warmth",
    ),
    (
        "Studio Clean & Minimal",
        &["studio", "all"],
        "Pure white cyc wall, single key with rim separation, negative space dominance",
    ),
    (
        "Studio Product Packshot",
        &["studio", "all"],
        "Even tent lighting, colour-accurate white background, catalogue precision",
    ),
    (
        "Flat Lay Graphic Arrangement",
        &["flatlay"],
        "Overhead geometric arrangement, hard shadows, bold colour blocking",
    ),
    (
        "Vogue Italia Editorial Drama",
        &["fashion-beauty", "luxury-prestige"],
        "High-contrast fashion lighting, bold poses, avant-garde framing",
    ),
    (
        "Clean Beauty Transparency",
        &["fashion-beauty", "minimal"],
        "Ingredients on glass, soft high-key light, dewy skin close-ups",
    ),
    (
        "Inclusive Beauty Celebration",
        &["fashion-beauty", "documentary-editorial"],
        "Diverse faces in natural light, honest skin texture, joyful expression",
    ),
    (
        "Luxury Fragrance Evocation",
        &["fashion-beauty", "luxury-prestige"],
        "Bottle refracting coloured light, silk and smoke, dreamlike depth",
    ),
    (
        "Street Style Documentary Authentic",
        &["fashion-beauty", "documentary-editorial"],
        "Sidewalk candid, available light, telephoto compression",
    ),
    (
        "Human-Centered AI Narrative",
        &["technology-innovation"],
        "People and screens in warm light, technology receding into the background",
    ),
    (
        "Electric Mobility Future",
        &["technology-innovation", "automotive-mobility"],
        "Charging ports and clean lines, cool blue dusk, reflective surfaces",
    ),
    (
        "Studio Tech Product Precision",
        &["technology-innovation", "studio"],
        "Floating device on gradient, precise specular highlights, engineered symmetry",
    ),
    (
        "Hyper-Luxury Grand Touring",
        &["automotive-mobility", "luxury-prestige"],
        "Coastal road at golden hour, rolling shots, sculpted bodywork reflections",
    ),
    (
        "Human Interest Photojournalism",
        &["documentary-editorial"],
        "Unposed human stories, available light, decisive moment framing",
    ),
    (
        "Corporate Trust Portraiture",
        &["finance-corporate"],
        "Confident professionals in glass offices, soft key with clean backgrounds",
    ),
    (
        "Clinical Care Warmth",
        &["healthcare-pharma"],
        "Caregivers and patients, soft daylight, reassuring whites and teals",
    ),
    (
        "Surreal Conceptual Still Life",
        &["experimental-art"],
        "Impossible object arrangements, theatrical hard light, dreamlike colour",
    ),
];

const PALETTES: &[Row] = &[
    (
        "Scandinavian Serenity",
        &["all", "minimal"],
        "Soft greys, pale birch and off-white; calm, trustworthy, 30% brand colour",
    ),
    (
        "Earth Regenerative",
        &["all", "sustainability"],
        "Terracotta, moss and clay; grounded and organic, 40% brand colour",
    ),
    (
        "Electric Optimism",
        &["all", "technology"],
        "Saturated cobalt, lime and coral accents; energetic, 60% brand colour",
    ),
    (
        "Heritage Luxury",
        &["all", "luxury"],
        "Deep burgundy, antique gold and ivory; prestige and craft, 35% brand colour",
    ),
    (
        "Ocean Conservation",
        &["all", "sustainability"],
        "Teal, sea glass and sand; fresh and responsible, 45% brand colour",
    ),
    (
        "Botanical Garden",
        &["all", "wellness"],
        "Leaf greens with blush florals; natural vitality, 40% brand colour",
    ),
    (
        "Desert Sunset",
        &["all", "lifestyle"],
        "Apricot, dusty rose and burnt sienna; warm nostalgia, 50% brand colour",
    ),
    (
        "Monochrome Power",
        &["all", "fashion"],
        "Black, white and one brand accent; bold and graphic, 20% brand colour",
    ),
    (
        "Artisan Warmth",
        &["all", "food"],
        "Honey, walnut and cream; handmade comfort, 40% brand colour",
    ),
    (
        "Clinical Trust",
        &["all", "healthcare"],
        "Clean whites, sky blue and mint; precise and reassuring, 30% brand colour",
    ),
    (
        "Citrus Burst",
        &["all", "beverage"],
        "Lemon, tangerine and leaf green; zesty refreshment, 55% brand colour",
    ),
    (
        "Morning Pastel",
        &["all", "breakfast"],
        "Butter yellow, powder blue and peach; gentle optimism, 45% brand colour",
    ),
];

const FRAMEWORKS: &[Row] = &[
    (
        "The Tension Principle",
        &["all"],
        "Stage a visual contradiction, resolve it through the product",
    ),
    (
        "The Authenticity Engine",
        &["all"],
        "Real people, real places, unretouched detail as proof of honesty",
    ),
    (
        "The Utility First Approach",
        &["all"],
        "Show the product solving a concrete everyday need in one frame",
    ),
    (
        "The Cultural Catalyst Method",
        &["all"],
        "Anchor the product in a current cultural ritual or moment",
    ),
    (
        "The Craft Excellence Standard",
        &["all"],
        "Celebrate making: materials, hands, process, precision",
    ),
    (
        "Before / After Transformation",
        &["all"],
        "Initial state, product intervention, visible result",
    ),
    (
        "Problem / Solution",
        &["all"],
        "Name a frustration, present the product as the relief",
    ),
    (
        "Hero Journey Storytelling",
        &["all"],
        "Ordinary moment, challenge, triumph with the product at the turn",
    ),
    (
        "Educational Step-by-Step",
        &["all"],
        "Break a process into clear, actionable stages",
    ),
    (
        "Social Proof Testimonial",
        &["all"],
        "Community voices and shared moments validating the product",
    ),
];

const CONTEXTS: &[Row] = &[
    (
        "Bright Modern Kitchen",
        &["food", "beverage", "breakfast", "morning"],
        "Clean kitchen, natural light, home cooking aesthetic",
    ),
    (
        "Convivial Family Table",
        &["food", "beverage", "meal", "family"],
        "Family dining, shared moments, togetherness",
    ),
    (
        "Outdoor Picnic",
        &["food", "beverage", "outdoor", "summer"],
        "Outdoor dining, nature setting, al fresco vibes",
    ),
    (
        "Urban Lifestyle Café",
        &["food", "beverage", "lifestyle", "coffee", "morning"],
        "Coffee shop setting, urban cool, social gathering",
    ),
    (
        "Fine Dining Restaurant",
        &["food", "gourmet", "dinner"],
        "Upscale restaurant, gourmet presentation, culinary excellence",
    ),
    (
        "Urban Street Food",
        &["food", "beverage", "snack", "on-the-go"],
        "Food truck, street vendor, urban food culture",
    ),
    (
        "Weekend Brunch Cocooning",
        &["food", "beverage", "breakfast", "brunch"],
        "Lazy weekend morning, comfort food, relaxation",
    ),
    (
        "Professional Chef Kitchen",
        &["food", "craft"],
        "Chef kitchen, professional tools, culinary craftsmanship",
    ),
    (
        "Solo Unwinding Moment",
        &["beverage", "lifestyle", "relaxation"],
        "Personal relaxation, me-time, self-care moment",
    ),
    (
        "Party With Friends",
        &["beverage", "food", "celebration", "evening"],
        "Party atmosphere, social gathering, celebration vibes",
    ),
    (
        "Post-Workout Gym",
        &["beverage", "sport", "refreshment", "workout"],
        "Gym setting, active lifestyle, post-workout refreshment",
    ),
    (
        "Office Workspace Desk",
        &["beverage", "lifestyle", "work", "energy"],
        "Office desk, productivity fuel, work companion",
    ),
    (
        "Poolside Summer Day",
        &["beverage", "summer", "refreshment", "outdoor"],
        "Pool party, beach day, summer refreshment, vacation mode",
    ),
    (
        "Road Trip Adventure",
        &["beverage", "lifestyle", "travel", "on-the-go"],
        "Car travel, adventure companion, on-the-go lifestyle",
    ),
    (
        "Cosy Evening In",
        &["beverage", "lifestyle", "evening", "relaxation"],
        "Evening relaxation, cozy home, wind-down ritual",
    ),
    (
        "Sunrise Balcony",
        &["beverage", "breakfast", "morning"],
        "First light over the city, a drink in hand, quiet start to the day",
    ),
    (
        "Farmers Market Stroll",
        &["food", "beverage", "refreshment", "outdoor"],
        "Fresh produce stalls, reusable bags, sunny weekend market",
    ),
    (
        "Beach Cooler Break",
        &["beverage", "refreshment", "summer"],
        "Ice-filled cooler on the sand, bright surf backdrop",
    ),
    (
        "Modern Bathroom Ritual",
        &["cosmetic", "wellness", "morning"],
        "Bathroom ritual, morning routine, self-care space",
    ),
    (
        "Elegant Vanity Table",
        &["cosmetic", "beauty"],
        "Makeup station, beauty ritual, glamour moment",
    ),
    (
        "Wellness Spa",
        &["cosmetic", "wellness", "relaxation"],
        "Spa treatment, professional care, luxury pampering",
    ),
    (
        "Travel Beauty Bag",
        &["cosmetic", "lifestyle", "travel"],
        "Travel essentials, jet-setter lifestyle, portable beauty",
    ),
    (
        "Backstage Atelier",
        &["cosmetic", "fashion"],
        "Professional makeup, backstage glamour, artistry",
    ),
    (
        "Modern Living Room",
        &["lifestyle", "home"],
        "Living room, home design, contemporary living",
    ),
    (
        "Garden Terrace",
        &["lifestyle", "wellness", "outdoor"],
        "Outdoor living, garden space, fresh air lifestyle",
    ),
    (
        "Creative Studio Workshop",
        &["lifestyle", "creative"],
        "Creative workspace, artistic environment, maker space",
    ),
    (
        "Modern Office Workspace",
        &["tech", "work"],
        "Modern office, productivity space, professional setting",
    ),
    (
        "Commuter Transit",
        &["tech", "on-the-go"],
        "On-the-go, transit usage, mobile lifestyle",
    ),
    (
        "Home Office Setup",
        &["tech", "work"],
        "Work from home, remote setup, hybrid workspace",
    ),
    (
        "Nordic Minimalist Interior",
        &["lifestyle", "home", "minimal"],
        "Pale wood, white walls, a single design object in soft daylight",
    ),
    (
        "Mediterranean Coastal Terrace",
        &["lifestyle", "beverage", "summer", "evening"],
        "Whitewashed terrace above the sea, late sun, linen and terracotta",
    ),
    (
        "Urban Rooftop Garden Oasis",
        &["lifestyle", "beverage", "outdoor", "evening"],
        "Planted rooftop among skyscrapers, string lights at dusk",
    ),
    (
        "Brooklyn Industrial Loft",
        &["lifestyle", "creative", "fashion"],
        "Exposed brick, steel windows, raw textures",
    ),
    (
        "Professional Studio",
        &["all"],
        "Professional studio, controlled environment, product focus",
    ),
    (
        "Everyday Lifestyle",
        &["all"],
        "Everyday life, authentic moments, relatable context",
    ),
];

const LIGHTINGS: &[Row] = &[
    (
        "Golden Hour Morning",
        &["all", "morning"],
        "6h-8h; warm golden light, soft shadows; fresh, optimistic",
    ),
    (
        "Bright Midday",
        &["all", "midday"],
        "11h-14h; strong direct light, crisp shadows; energetic, vibrant",
    ),
    (
        "Afternoon Soft",
        &["all", "afternoon"],
        "15h-17h; diffused warm light, softer shadows; comfortable, focused",
    ),
    (
        "Golden Hour Evening",
        &["all", "evening"],
        "17h-19h; long shadows, warm glow; romantic, nostalgic",
    ),
    (
        "Blue Hour",
        &["all", "evening"],
        "19h-20h; cool twilight tones; peaceful, contemplative",
    ),
    (
        "Night Ambiance",
        &["all", "night"],
        "21h+; warm interior practicals; intimate, cozy",
    ),
    (
        "Overcast Soft",
        &["all"],
        "Any time; even diffused light, natural softbox; calm, reliable",
    ),
    (
        "Studio Rim Light",
        &["all", "studio"],
        "Twin strip lights carving the silhouette on dark; premium, sculptural",
    ),
    (
        "Window Side Light",
        &["all", "interior"],
        "Single window from the side, gentle falloff; intimate, painterly",
    ),
    (
        "Neon Night Glow",
        &["all", "night"],
        "Coloured neon spill and reflections; urban, electric",
    ),
];

use crate::models::GameRecord;

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: u64,
    title: &str,
    developer: &str,
    publisher: &str,
    release_date: &str,
    platforms: &[&str],
    genre: &str,
    description: &str,
    image_text: &str,
    categories: &[&str],
    tags: &[&str],
    rating: &str,
) -> GameRecord {
    GameRecord {
        id,
        title: title.to_string(),
        developer: developer.to_string(),
        publisher: publisher.to_string(),
        release_date: release_date.to_string(),
        platforms: owned(platforms),
        genre: genre.to_string(),
        categories: owned(categories),
        tags: owned(tags),
        description: description.to_string(),
        rating: rating.to_string(),
        image_url: Some(format!(
            "https://via.placeholder.com/200x300/333333/ffffff?text={image_text}"
        )),
        featured: false,
    }
}

/// Built-in catalog used whenever the configured source cannot be loaded.
pub fn sample_games() -> Vec<GameRecord> {
    let mut zelda = record(
        1,
        "The Legend of Zelda: Breath of the Wild",
        "Nintendo EPD",
        "Nintendo",
        "2017-03-03",
        &["Nintendo Switch", "Wii U"],
        "action-adventure",
        "An open-world action-adventure game that reinvented the Zelda formula with innovative gameplay mechanics and a vast, explorable world.",
        "Zelda+BOTW",
        &["adventure", "open-world", "nintendo"],
        &["exploration", "puzzle", "fantasy"],
        "E10+",
    );
    zelda.featured = true;

    vec![
        zelda,
        record(
            2,
            "Cyberpunk 2077",
            "CD Projekt RED",
            "CD Projekt",
            "2020-12-10",
            &["PC", "PlayStation 4", "PlayStation 5", "Xbox One", "Xbox Series X/S"],
            "rpg",
            "A futuristic RPG set in Night City, offering a deep narrative experience with cybernetic enhancements and multiple story paths.",
            "Cyberpunk+2077",
            &["rpg", "sci-fi", "open-world"],
            &["futuristic", "story-driven", "choices"],
            "M",
        ),
        record(
            3,
            "Minecraft",
            "Mojang Studios",
            "Microsoft",
            "2011-11-18",
            &["PC", "PlayStation", "Xbox", "Nintendo Switch", "Mobile"],
            "simulation",
            "A sandbox game that allows players to build, explore, and survive in procedurally generated worlds made of blocks.",
            "Minecraft",
            &["sandbox", "survival", "creative"],
            &["building", "multiplayer", "creativity"],
            "E10+",
        ),
        record(
            4,
            "Among Us",
            "InnerSloth",
            "InnerSloth",
            "2018-06-15",
            &["PC", "Mobile", "Nintendo Switch", "PlayStation", "Xbox"],
            "strategy",
            "A multiplayer social deduction game where players work together to maintain a spaceship while identifying impostors among the crew.",
            "Among+Us",
            &["multiplayer", "social", "indie"],
            &["deduction", "party", "online"],
            "E10+",
        ),
        record(
            5,
            "The Witcher 3: Wild Hunt",
            "CD Projekt RED",
            "CD Projekt",
            "2015-05-19",
            &[
                "PC",
                "PlayStation 4",
                "PlayStation 5",
                "Xbox One",
                "Xbox Series X/S",
                "Nintendo Switch",
            ],
            "rpg",
            "An epic fantasy RPG following Geralt of Rivia on his quest to find his adopted daughter in a war-torn open world.",
            "Witcher+3",
            &["rpg", "fantasy", "open-world"],
            &["story-driven", "choices", "mature"],
            "M",
        ),
        record(
            6,
            "Super Mario Odyssey",
            "Nintendo EPD",
            "Nintendo",
            "2017-10-27",
            &["Nintendo Switch"],
            "platformer",
            "A 3D platformer featuring Mario and his hat companion Cappy on a globe-trotting adventure to save Princess Peach.",
            "Mario+Odyssey",
            &["platformer", "adventure", "nintendo"],
            &["family-friendly", "exploration", "collectibles"],
            "E10+",
        ),
        record(
            7,
            "God of War (2018)",
            "Santa Monica Studio",
            "Sony Interactive Entertainment",
            "2018-04-20",
            &["PlayStation 4", "PlayStation 5", "PC"],
            "action",
            "A mature reboot of the God of War series, focusing on Kratos and his son Atreus in Norse mythology.",
            "God+of+War",
            &["action", "adventure", "mythology"],
            &["story-driven", "combat", "father-son"],
            "M",
        ),
        record(
            8,
            "Fall Guys",
            "Mediatonic",
            "Devolver Digital",
            "2020-08-04",
            &[
                "PC",
                "PlayStation 4",
                "PlayStation 5",
                "Xbox One",
                "Xbox Series X/S",
                "Nintendo Switch",
            ],
            "party",
            "A colorful battle royale game featuring jellybean-like characters competing in whimsical obstacle courses.",
            "Fall+Guys",
            &["party", "multiplayer", "casual"],
            &["fun", "colorful", "competitive"],
            "E",
        ),
        record(
            9,
            "Hades",
            "Supergiant Games",
            "Supergiant Games",
            "2020-09-17",
            &[
                "PC",
                "PlayStation 4",
                "PlayStation 5",
                "Xbox One",
                "Xbox Series X/S",
                "Nintendo Switch",
            ],
            "roguelike",
            "A roguelike dungeon crawler where you play as Zagreus, son of Hades, attempting to escape the underworld.",
            "Hades",
            &["roguelike", "indie", "mythology"],
            &["story-driven", "challenging", "replayable"],
            "T",
        ),
        record(
            10,
            "Animal Crossing: New Horizons",
            "Nintendo EPD",
            "Nintendo",
            "2020-03-20",
            &["Nintendo Switch"],
            "simulation",
            "A life simulation game where players develop a deserted island into a thriving community of anthropomorphic animals.",
            "Animal+Crossing",
            &["simulation", "social", "nintendo"],
            &["relaxing", "customization", "social"],
            "E",
        ),
    ]
}

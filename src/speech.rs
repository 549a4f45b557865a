//! Per-character speech lines, bucketed by topic. Flavor only; nothing in
//! here feeds back into the simulation.

use crate::model::{Character, Mood};
use rand::{rngs::StdRng, Rng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Topic {
    Birth,
    Happy,
    Hungry,
    Sad,
    Sick,
    Sleeping,
    Training,
    Feed,
    Heal,
    Treat,
}

impl Topic {
    pub(crate) fn for_mood(mood: Mood) -> Topic {
        match mood {
            Mood::Happy | Mood::Normal => Topic::Happy,
            Mood::Hungry => Topic::Hungry,
            Mood::Sad => Topic::Sad,
            Mood::Sick => Topic::Sick,
            Mood::Sleeping => Topic::Sleeping,
        }
    }
}

fn lines(character: Character, topic: Topic) -> &'static [&'static str] {
    match character {
        Character::Merc => match topic {
            Topic::Birth => &[
                "Hey there! Your favorite merc, reporting for duty!",
                "Breaking the fourth wall has never been this fun!",
                "I'm basically unkillable, so this is gonna be a LONG friendship!",
            ],
            Topic::Happy => &[
                "This is better than chimichangas! Almost...",
                "You're the best sidekick a merc could ask for!",
                "Maximum effort in everything we do!",
                "Is the narrator seeing this? Because I look GREAT.",
            ],
            Topic::Hungry => &[
                "Where are my chimichangas?! I NEED CHIMICHANGAS!",
                "A hungry merc is a dangerous merc...",
                "Feed me or I'll break more than the fourth wall!",
            ],
            Topic::Sad => &[
                "Not even my healing factor fixes this loneliness...",
                "I talk a lot, but I missed you!",
                "Where'd you go? I was saving my best jokes!",
            ],
            Topic::Sick => &[
                "Don't worry, I heal fast! A little care wouldn't hurt though...",
                "My healing factor is apparently on vacation...",
                "Even I need a med kit sometimes!",
            ],
            Topic::Sleeping => &[
                "Maximum effort requires maximum rest...",
                "Even mercs need their beauty sleep!",
                "Quick nap before more chaos!",
            ],
            Topic::Training => &[
                "Training montage! Cue the 80s music!",
                "Getting stronger! Soon I'll be able to lift... things!",
                "Maximum effort training equals maximum gains!",
            ],
            Topic::Feed => &["Mmm! Better than wheat cakes!"],
            Topic::Heal => &["My healing factor is back online!"],
            Topic::Treat => &["Sweet! Almost as good as a chimichanga!"],
        },
        Character::Wolf => match topic {
            Topic::Birth => &[
                "Hey, kid. Ready to see what these claws can do?",
                "I'm the best at what I do, and what I do is be your pet!",
                "Welcome to the big leagues, bub.",
            ],
            Topic::Happy => &[
                "This beats a cold beer after a long fight!",
                "You're alright, kid. Reminds me of the good days.",
                "My instincts say you're one of the good ones!",
                "Snikt! That's the sound of happiness, bub!",
            ],
            Topic::Hungry => &[
                "My stomach's growling louder than I am!",
                "I could go for some back bacon right now...",
                "Feed the beast, or face the claws!",
            ],
            Topic::Sad => &[
                "Even an old-timer like me gets lonely sometimes...",
                "You were gone so long I figured trouble got you...",
                "Loneliness cuts deeper than any metal...",
            ],
            Topic::Sick => &[
                "My healing ain't what it used to be...",
                "I've felt better after losing a bar fight...",
                "Help an old brawler out, will ya?",
            ],
            Topic::Sleeping => &[
                "These old bones need their rest...",
                "Time to hibernate like a real wolverine...",
                "Even the tough ones need downtime...",
            ],
            Topic::Training => &[
                "Time to hit the danger room!",
                "Train hard, fight harder!",
                "Sharpening these claws and skills!",
            ],
            Topic::Feed => &["Thanks, bub. That hit the spot!"],
            Topic::Heal => &["Feeling like I could go ten rounds again!"],
            Topic::Treat => &["Not bad, kid. Got any more of these?"],
        },
    }
}

pub(crate) fn pick(rng: &mut StdRng, character: Character, topic: Topic) -> &'static str {
    let pool = lines(character, topic);
    pool[rng.gen_range(0..pool.len())]
}

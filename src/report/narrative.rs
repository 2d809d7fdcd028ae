//! Static prose of the report.

pub const TITLE: &str = "\u{2764} The Rise and Evolution of K-Dramas in 2023 \u{2764}";

pub const INTRODUCTION: &str = "Korean dramas (K-dramas) have transitioned from being regional entertainment staples to global cultural touchstones. With compelling narratives, stellar acting, and production quality, they have gained massive followings across continents. This analysis uncovers key trends driving this success, delves into the factors influencing audience preferences, and highlights their diverse storytelling techniques.";

pub const SURGE_HEADING: &str = "Chapter 1: The Surge in K-Drama Production";
pub const SURGE_LEAD: &str = "In recent years, the K-drama industry has entered what can be considered its golden era. The sheer volume of productions has skyrocketed, with over 50% of top-rated dramas released after 2017. Global streaming platforms like Netflix and the pandemic-driven shift to at-home entertainment have fueled a boom in K-drama production, making them more accessible than ever.";

pub const SHORT_HEADING: &str = "Chapter 2: The Magic of Short and Sweet";
pub const SHORT_LEAD: &str = "While some viewers appreciate long story arcs, shorter K-dramas dominate ratings. Concise storytelling paired with emotional depth creates a winning formula.";
pub const SHORT_CAPTION: &str = "Dramas with fewer than 16 episodes often outperform longer series in ratings, underscoring the audience's preference for tightly woven plots.";

pub const GENRE_HEADING: &str = "Chapter 3: A Genre for Every Mood";
pub const GENRE_LEAD: &str = "From romance to thrillers, K-dramas offer something for everyone. While traditional romance and life dramas remain staples, action and medical genres are seeing steady growth.";
pub const GENRE_CAPTION: &str = "Genres like action and thriller, often featuring intricate plots and edge-of-the-seat moments, are gaining traction among younger viewers, breaking the stereotype of K-dramas as purely romance-centric.";

pub const NETWORK_HEADING: &str = "Chapter 4: Platforms That Define K-Dramas";
pub const NETWORK_LEAD: &str = "The Titans of Distribution Netflix, tvN, and JTBC have emerged as powerhouses, delivering the highest-rated dramas. Their global distribution networks and investment in high-quality content make them industry leaders.";
pub const NETWORK_CAPTION: &str = "Netflix's global accessibility and tvN's rich storytelling have made them go-to platforms for premium K-dramas, with consistent critical and audience acclaim.";

pub const RHYTHM_HEADING: &str = "Chapter 5: The Rhythm of K-Drama Releases";
pub const RHYTHM_LEAD: &str = "K-Dramas are not just about captivating stories; their scheduling plays a pivotal role in engaging viewers. By analyzing the days on which dramas are aired, we uncover patterns that reflect audience preferences and broadcasting strategies.";
pub const RHYTHM_CAPTION: &str = "Certain days, like Friday and Saturday, dominate the schedule for K-Drama releases. Friday & Saturday are prime days for airing new episodes, as they coincide with the start of the weekend, when viewers are more likely to have leisure time to relax and binge-watch. While weekdays are less dominant, they cater to a dedicated audience that prefers a consistent schedule to unwind after work or school. The chart highlights these patterns, with Friday often taking the lead, emphasizing its role as the gateway to the weekend binge. The rhythm of K-Drama airing days mirrors the careful planning behind their success. From weekday consistency to weekend excitement, the schedule ensures that dramas capture and hold viewer attention, contributing significantly to their popularity and cultural impact.";

pub const BOLDNESS_HEADING: &str = "Chapter 6: Thematic Boldness";
pub const BOLDNESS_LEAD: &str = "K-dramas are no longer confined to lighthearted or family-friendly themes. Recent years have seen a surge in mature, gritty narratives targeting a more diverse demographic.";
pub const BOLDNESS_CAPTION: &str = "18+ Restricted content has gained prominence, showcasing bold storytelling that resonates with modern audiences craving realism and complexity.";

pub const THEMES_HEADING: &str = "Chapter 7: The Essence of Themes";
pub const THEMES_LEAD: &str = "K-Dramas are renowned not only for their gripping storylines but also for the unique themes and motifs that resonate with viewers. These recurring themes, captured in tags, reveal what audiences connect with most deeply. By analyzing the most common tags, we gain insight into the core elements that define popular K-Dramas.";
pub const THEMES_CAPTION: &str = "The analysis reveals recurring themes such as Family, Friendship, Romance, and Secrets, which are central to the storytelling fabric of K-Dramas. For instance, Family and Friendship themes highlight the importance of relationships and bonds, a hallmark of emotional Korean storytelling. Romance continues to dominate as a universal favorite, while Secrets and Betrayal reflect the love for suspense and drama among audiences. These common tags not only shape narratives but also connect deeply with viewers on emotional and psychological levels.";

pub const FAME_HEADING: &str = "Chapter 8: The Hall of Fame";
pub const FAME_LEAD: &str = "What makes a K-drama unforgettable? A mix of high ratings, groundbreaking narratives, and exceptional casts. Highlighting the top-rated dramas provides a glimpse into what works.";
pub const FAME_CAPTION: &str = "Dramas like Move to Heaven and Hospital Playlist stand out for their deep emotional resonance and relatability, earning them spots in the hall of fame.";

pub const EPILOGUE: &str = "Epilogue: K-Dramas and the Future. As K-dramas continue to evolve, they are redefining storytelling in the global entertainment industry. The data highlights the industry's adaptability, offering timeless romance, nail-biting thrillers, and socially relevant themes. With the world as their stage, K-dramas are here to stay.";

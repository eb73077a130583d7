#[cfg(test)]
pub const POST_DATA_MD: &str = r##"---
title: What I learned as a product designer at Apple.
date: 2022-12-30
description: Notes from three years of shipping hardware and software.
thumbnail: thumbnail.jpg
category: Technology
tags:
  - design
  - apple
  - product
---

How to be a great product designer?

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

![Studio desk](desk.jpg)

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
Some day in your life, you will find that there are many designers much better than you. __The earlier you find that, the better.__ This will drive you to improve yourself as you now recognize better your weakest points.
"##;

#[cfg(test)]
pub const POST_DATA_CODE_MD: &str = r##"---
title: React Best Practices in 2023
date: 2023-01-15
description: Patterns that survived a year of production use.
thumbnail: https://cdn.example.com/react.png
category: Programming
tags: [react, javascript, frontend]
---

Start with a component:

```javascript
const Hello = () => <p>Hello</p>;
```

| Hook | Use |
|------|-----|
| useState | local state |

Read the [docs](https://react.dev) first.
"##;

#[cfg(test)]
pub const POST_DATA_CSS_MD: &str = r##"---
title: CSS Tips and Tricks
date: 2023-02-20
description: Small things that make layouts behave.
thumbnail: /img/shared/css.png
category: Design
tags:
  - css
  - design
  - frontend
---

Use `gap` instead of margins.
"##;

#[cfg(test)]
pub const POST_DATA_NO_DATE_MD: &str = r##"---
title: Draft without a date
description: This one is not ready.
thumbnail: draft.png
---

Work in progress.
"##;

#[cfg(test)]
pub const POST_DATA_BAD_DATE_MD: &str = r##"---
title: Draft with a broken date
date: someday
description: This one is not ready either.
thumbnail: draft.png
---

Work in progress.
"##;

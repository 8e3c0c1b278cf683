/*!

This is the long-form manual for `skating_ranking` and `roomrank`.

## The ranking method

The participants of a room each rank the objects of the room. Rankings may be
incomplete: a participant does not have to rank every object. The rankings are
combined with a variant of the skating system used to score dance competitions.

For every candidate and every rank, count the ballots placing the candidate at
that rank. A candidate listed on `n` ballots needs a majority of `n / 2 + 1` of
those ballots (integer division). Its *majority rank* is the first rank at which
the ballots placing it at that rank or better reach this majority.

Candidates are then ordered by:
1. the majority rank, lowest first
2. the number of ballots at rank 1, then at rank 2, and so on, highest first
3. the identifier of the candidate

Candidates that are equal on the first two criteria share a rank, and the next
rank is skipped, as in a competition: two candidates tied at rank 1 are followed
by a candidate at rank 3.

For example, with the ballots

```text
A B C
B A C
A C
B C A
```

`A` needs 3 of its 4 ballots and gets them at rank 2, `B` needs 2 of its 3
ballots and gets them at rank 1, `C` needs 3 of its 4 ballots and gets them at
rank 3. The final order is `B`, `A`, `C`.

Objects of the room that nobody ranked come last, all sharing the rank after
the last ranked object.

### Stored rankings

A stored ranking maps each object to a position. Positions do not need to start
at 1 or to be contiguous: only their order matters. When two objects share a
position, the one listed first in the ranking comes first. Positions that are
not integers are ignored, as are objects that the room no longer contains.

## Input formats

`roomrank` reads a snapshot of a room in JSON:

```text
{
  "room": { "id": "cats", "name": "Cat names" },
  "objects": [
    { "id": 1, "title": "Tom" },
    { "id": 2, "title": "Felix" }
  ],
  "participants": [
    { "user": "alice", "vote_confirmed": true, "vote_data": { "1": 2, "2": 1 } },
    { "user": "bob", "vote_confirmed": false, "vote_data": { "1": 1 } }
  ]
}
```

Only the participants who confirmed their vote are counted. Identifiers can be
numbers or strings. Positions can be numbers or strings holding a number.

### csv

Rankings can also be exported to CSV files, listed in the snapshot under
`participantFileSources`:

```text
"participantFileSources": [ { "provider": "csv", "filePath": "votes.csv" } ]
```

The path is relative to the snapshot. The file has one row per ranked object:

```text
user,object,position
alice,1,2
alice,2,1
bob,2,1
```

The rows of a user do not need to be contiguous. All the rankings of a file are
considered confirmed, unless the source sets `"voteConfirmed": false`.

## Output

The results are written in JSON, ordered by final rank:

```text
{
  "room": { "id": "cats", "name": "Cat names" },
  "final_results": {
    "2": {
      "final_rank": 1,
      "average_position": 1.0,
      "vote_count": 1,
      "title": "Felix",
      "vote_distribution": { "1": 1 }
    },
    ...
  }
}
```

The average position is the mean of the positions an object received in the
ballots, rounded to two decimals.

 */
